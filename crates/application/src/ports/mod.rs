mod query_handler;
mod record_store;
mod upstream_exchange;

pub use query_handler::QueryHandler;
pub use record_store::RecordStore;
pub use upstream_exchange::UpstreamExchange;
