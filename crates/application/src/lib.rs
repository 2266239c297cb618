//! qtype-dns application layer: ports and the query-answering use cases.
pub mod ports;
pub mod services;
pub mod use_cases;
