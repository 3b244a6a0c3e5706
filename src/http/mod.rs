pub mod client;
pub mod request;
pub mod response;
pub mod types;

// Re-export commonly used types for convenient access
pub use client::{HttpTransport, Transport, TransportError};
pub use request::RequestDescriptor;
pub use response::ResponseData;
