pub mod record_encoder;
pub mod reply;
pub mod routing_table;

pub use record_encoder::{encode_record, parse_name};
pub use reply::{error_reply, reply_to, single_question, SERVER_UDP_PAYLOAD};
pub use routing_table::{RoutingTable, ServerList};
