pub mod exchange;
pub mod record_store;
pub mod server;
pub mod transport;
pub mod zone_gate;

pub use exchange::TransportExchange;
pub use record_store::InMemoryRecordStore;
pub use server::DnsServerHandler;
pub use zone_gate::ZoneGate;
