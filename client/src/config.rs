//! Where the marketplace contract lives and how to reach it.
//!
//! Resolved from the environment (`DAPPBNB_*` variables) or from the
//! `contractAddress.json` artifact written by the contract deploy script.

use std::path::Path;

use alloy::transports::http::reqwest::Url;
use dappbnb_common::Address;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

pub const RPC_URL_ENV: &str = "DAPPBNB_RPC_URL";
pub const CONTRACT_ADDRESS_ENV: &str = "DAPPBNB_CONTRACT_ADDRESS";
pub const CONTRACT_FILE_ENV: &str = "DAPPBNB_CONTRACT_FILE";
pub const PRIVATE_KEY_ENV: &str = "DAPPBNB_PRIVATE_KEY";

/// Local development chain (hardhat / anvil default).
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// The deploy artifact: `{"dappBnbContract": "0x..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractAddressFile {
    #[serde(rename = "dappBnbContract")]
    pub dapp_bnb_contract: Address,
}

impl ContractAddressFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ClientError::Config(format!("reading {}: {e}", path.display())))?;
        serde_json::from_str(&text)
            .map_err(|e| ClientError::Config(format!("parsing {}: {e}", path.display())))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub rpc_url: Url,
    pub contract_address: Address,
}

impl GatewayConfig {
    pub fn new(rpc_url: &str, contract_address: Address) -> Result<Self, ClientError> {
        let rpc_url = rpc_url
            .parse()
            .map_err(|e| ClientError::Config(format!("invalid RPC URL {rpc_url:?}: {e}")))?;
        Ok(Self {
            rpc_url,
            contract_address,
        })
    }

    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Resolve from a variable lookup. An explicit address wins over the
    /// artifact file.
    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let rpc_url = get(RPC_URL_ENV).unwrap_or_else(|| DEFAULT_RPC_URL.to_string());
        let contract_address = match (get(CONTRACT_ADDRESS_ENV), get(CONTRACT_FILE_ENV)) {
            (Some(address), _) => parse_address(&address)?,
            (None, Some(path)) => ContractAddressFile::load(path)?.dapp_bnb_contract,
            (None, None) => {
                return Err(ClientError::Config(format!(
                    "set {CONTRACT_ADDRESS_ENV} or {CONTRACT_FILE_ENV}"
                )))
            }
        };
        Self::new(&rpc_url, contract_address)
    }
}

pub fn parse_address(text: &str) -> Result<Address, ClientError> {
    text.trim()
        .parse()
        .map_err(|e| ClientError::Config(format!("invalid contract address {text:?}: {e}")))
}
