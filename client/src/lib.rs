pub mod adapter;
pub mod config;
pub mod draft;
pub mod error;
pub mod evm;
pub mod gateway;
pub mod id;
pub mod state;

pub use adapter::{Marketplace, WriteOutcome};
pub use error::ClientError;
