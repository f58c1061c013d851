//! Transport layer for the Locintel SDK.

pub mod http;

pub use http::HttpTransport;
