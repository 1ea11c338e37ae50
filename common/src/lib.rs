pub mod booking;
pub mod listing;
pub mod money;
pub mod raw;
pub mod review;

pub use alloy_primitives::{Address, TxHash, U256};
