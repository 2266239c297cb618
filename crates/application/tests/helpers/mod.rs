#![allow(dead_code)]

mod mock_record_store;
mod mock_upstream;

pub use mock_record_store::MockRecordStore;
pub use mock_upstream::{MockOutcome, MockUpstreamExchange, RecordedCall};

use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::rdata::{A, AAAA};
use hickory_proto::rr::{Name, RData, Record, RecordType};
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

pub fn name(s: &str) -> Name {
    Name::from_str(s).unwrap()
}

pub fn build_request(id: u16, questions: &[(&str, RecordType)]) -> Message {
    let mut request = Message::new();
    request
        .set_id(id)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true);
    for (domain, qtype) in questions {
        request.add_query(Query::query(name(domain), *qtype));
    }
    request
}

pub fn a_record(domain: &str, ip: [u8; 4]) -> Record {
    Record::from_rdata(
        name(domain),
        300,
        RData::A(A(Ipv4Addr::new(ip[0], ip[1], ip[2], ip[3]))),
    )
}

pub fn aaaa_record(domain: &str, ip: &str) -> Record {
    Record::from_rdata(
        name(domain),
        300,
        RData::AAAA(AAAA(Ipv6Addr::from_str(ip).unwrap())),
    )
}
