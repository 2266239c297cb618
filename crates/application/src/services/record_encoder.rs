use hickory_proto::rr::rdata::{A, AAAA, CNAME, NS, PTR, TXT};
use hickory_proto::rr::{Name, RData, Record};
use qtype_dns_domain::{normalize_name, DomainError, RecordType};
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

pub fn parse_name(text: &str) -> Result<Name, DomainError> {
    Name::from_str(&normalize_name(text))
        .map_err(|e| DomainError::InvalidDomainName(format!("'{}': {}", text, e)))
}

/// Builds an answer record from a configured text value. Supported types are
/// A and AAAA (address literals), CNAME, NS and PTR (target names) and TXT.
pub fn encode_record(
    owner: &Name,
    record_type: RecordType,
    value: &str,
    ttl: u32,
) -> Result<Record, DomainError> {
    let value = value.trim();
    let invalid = |what: &str| {
        DomainError::InvalidRecordValue(format!("{} value '{}': {}", record_type, value, what))
    };

    let rdata = match record_type {
        RecordType::A => {
            let ip = Ipv4Addr::from_str(value).map_err(|e| invalid(&e.to_string()))?;
            RData::A(A(ip))
        }
        RecordType::AAAA => {
            let ip = Ipv6Addr::from_str(value).map_err(|e| invalid(&e.to_string()))?;
            RData::AAAA(AAAA(ip))
        }
        RecordType::CNAME => RData::CNAME(CNAME(parse_name(value)?)),
        RecordType::NS => RData::NS(NS(parse_name(value)?)),
        RecordType::PTR => RData::PTR(PTR(parse_name(value)?)),
        RecordType::TXT => RData::TXT(TXT::new(vec![value.to_string()])),
        other => {
            return Err(DomainError::InvalidRecordValue(format!(
                "{} records cannot be served statically",
                other
            )))
        }
    };

    Ok(Record::from_rdata(owner.clone(), ttl, rdata))
}
