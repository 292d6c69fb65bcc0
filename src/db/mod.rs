pub mod client;
pub mod connection;
pub mod dialect;
mod error;

pub use client::{Connection, open};
pub use connection::{ConnectOptions, connect_options};
pub use dialect::Dialect;
pub use error::ConnectError;
