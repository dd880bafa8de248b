pub mod client;
pub mod dto;
pub mod transport;

pub use client::{ActivityClient, ActivitySource, Endpoints};
pub use transport::HttpTransport;
