//! qtype-dns infrastructure: upstream transports, the in-memory record
//! store and the wire-level request handler used by the listeners.
pub mod dns;
