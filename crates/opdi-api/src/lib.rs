// opdi-api: Async Rust client for OPDI device firmware (HTTP polling + event stream)

pub mod client;
pub mod device;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod stream;
pub mod transport;

pub use client::DeviceClient;
pub use error::Error;
pub use stream::FrameStream;
pub use transport::{TlsMode, TransportConfig};
