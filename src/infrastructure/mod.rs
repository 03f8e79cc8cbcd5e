pub mod transport;

pub use transport::{LookupTransport, RawResponse, ReqwestTransport};
