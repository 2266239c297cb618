use hickory_proto::op::{Edns, Message, MessageType, ResponseCode};

/// UDP payload size this server advertises and accepts from clients.
pub const SERVER_UDP_PAYLOAD: u16 = 4096;

/// Starts a reply to `request`: same id, opcode, RD/CD flags and question
/// section, marked as a response with recursion available and NOERROR.
/// An EDNS request gets an OPT record advertising [`SERVER_UDP_PAYLOAD`].
pub fn reply_to(request: &Message) -> Message {
    let mut reply = Message::new();
    reply
        .set_id(request.id())
        .set_message_type(MessageType::Response)
        .set_op_code(request.op_code())
        .set_recursion_desired(request.recursion_desired())
        .set_recursion_available(true)
        .set_checking_disabled(request.checking_disabled())
        .set_response_code(ResponseCode::NoError);
    reply.add_queries(request.queries().to_vec());

    if request.extensions().is_some() {
        let mut edns = Edns::new();
        edns.set_max_payload(SERVER_UDP_PAYLOAD);
        edns.set_version(0);
        reply.set_edns(edns);
    }
    reply
}

/// A reply carrying only `code`, with no records.
pub fn error_reply(request: &Message, code: ResponseCode) -> Message {
    let mut reply = reply_to(request);
    reply.set_response_code(code);
    reply
}

/// Copy of `request` that asks only `query`. Header, flags and EDNS are
/// preserved.
pub fn single_question(request: &Message, query: &hickory_proto::op::Query) -> Message {
    let mut sub = request.clone();
    sub.take_queries();
    sub.add_query(query.clone());
    sub
}
