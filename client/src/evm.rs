//! Contract gateway backed by an EVM JSON-RPC endpoint.
//!
//! The wallet plays the part of the browser-injected provider: without one
//! there is no signer and every connection attempt fails with
//! [`ClientError::NoProvider`].

use std::fmt;

use alloy::network::EthereumWallet;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy::sol;
use dappbnb_common::booking::RawBooking;
use dappbnb_common::listing::{ListingId, RawListing};
use dappbnb_common::raw::{RawImages, RawNumber};
use dappbnb_common::review::RawReview;
use dappbnb_common::{Address, U256};

use crate::config::{GatewayConfig, PRIVATE_KEY_ENV};
use crate::error::ClientError;
use crate::gateway::{ContractCall, ContractGateway, MarketContract, TxReceipt};

sol! {
    #[sol(rpc)]
    #[derive(Debug)]
    contract DappBnb {
        struct ApartmentStruct {
            uint256 id;
            string name;
            string description;
            string location;
            string images;
            uint256 rooms;
            uint256 price;
            address owner;
            bool booked;
            bool deleted;
            uint256 timestamp;
        }

        struct BookingStruct {
            uint256 id;
            uint256 aid;
            address tenant;
            uint256 date;
            uint256 price;
            bool checked;
            bool cancelled;
        }

        struct ReviewStruct {
            uint256 id;
            uint256 aid;
            string reviewText;
            uint256 timestamp;
            address owner;
        }

        function securityFee() external view returns (uint256);

        function createAppartment(string name, string description, string location, string images, uint256 rooms, uint256 price) external;
        function updateAppartment(uint256 id, string name, string description, string location, string images, uint256 rooms, uint256 price) external;
        function deleteAppartment(uint256 id) external;
        function getApartments() external view returns (ApartmentStruct[] memory);
        function getApartment(uint256 id) external view returns (ApartmentStruct memory);

        function bookApartment(uint256 aid, uint256[] memory dates) external payable;
        function checkInApartment(uint256 aid, uint256 bookingId) external;
        function refundBooking(uint256 aid, uint256 bookingId) external;
        function getUnavailableDates(uint256 aid) external view returns (uint256[] memory);
        function getBookings(uint256 aid) external view returns (BookingStruct[] memory);
        function getQualifiedReviewers(uint256 aid) external view returns (address[] memory);

        function getReviews(uint256 aid) external view returns (ReviewStruct[] memory);
        function addReview(uint256 aid, string reviewText) external;
    }
}

/// A local signing key standing in for an injected wallet.
#[derive(Clone)]
pub struct InjectedWallet {
    signer: PrivateKeySigner,
}

impl InjectedWallet {
    pub fn from_private_key(key: &str) -> Result<Self, ClientError> {
        let signer = key
            .trim()
            .parse::<PrivateKeySigner>()
            .map_err(|e| ClientError::Config(format!("invalid private key: {e}")))?;
        Ok(Self { signer })
    }

    /// `None` when no key is configured, which callers surface as `NoProvider`.
    pub fn from_env() -> Result<Option<Self>, ClientError> {
        match std::env::var(PRIVATE_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Self::from_private_key(&key).map(Some),
            _ => Ok(None),
        }
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }
}

// Never print the key.
impl fmt::Debug for InjectedWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InjectedWallet")
            .field("address", &self.address())
            .finish()
    }
}

/// Build a contract handle bound to `config`'s address and `wallet`'s account.
///
/// Nothing is cached; each call wires a new provider.
pub fn connect_contract(config: &GatewayConfig, wallet: &InjectedWallet) -> DappBnbHandle {
    let provider = ProviderBuilder::new()
        .wallet(EthereumWallet::from(wallet.signer.clone()))
        .connect_http(config.rpc_url.clone())
        .erased();
    DappBnbHandle {
        contract: DappBnb::new(config.contract_address, provider),
        signer: wallet.address(),
    }
}

pub struct DappBnbHandle {
    contract: DappBnb::DappBnbInstance<DynProvider>,
    signer: Address,
}

impl DappBnbHandle {
    pub fn address(&self) -> Address {
        *self.contract.address()
    }
}

fn raw_listing(a: DappBnb::ApartmentStruct) -> RawListing {
    RawListing {
        id: a.id.into(),
        name: a.name,
        owner: a.owner,
        description: a.description,
        location: a.location,
        price: a.price.into(),
        rooms: a.rooms.into(),
        images: RawImages::Joined(a.images),
        deleted: a.deleted,
        booked: a.booked,
        timestamp: a.timestamp.into(),
    }
}

fn raw_booking(b: DappBnb::BookingStruct) -> RawBooking {
    RawBooking {
        id: b.id.into(),
        aid: b.aid.into(),
        tenant: b.tenant,
        date: b.date.into(),
        price: b.price.into(),
        checked: b.checked,
        cancelled: b.cancelled,
    }
}

fn raw_review(r: DappBnb::ReviewStruct) -> RawReview {
    RawReview {
        id: r.id.into(),
        aid: r.aid.into(),
        review_text: r.reviewText,
        timestamp: r.timestamp.into(),
        owner: r.owner,
    }
}

impl MarketContract for DappBnbHandle {
    async fn get_apartments(&self) -> Result<Vec<RawListing>, ClientError> {
        let apartments = self.contract.getApartments().call().await?;
        Ok(apartments.into_iter().map(raw_listing).collect())
    }

    async fn get_apartment(&self, id: ListingId) -> Result<RawListing, ClientError> {
        let apartment = self.contract.getApartment(U256::from(id)).call().await?;
        Ok(raw_listing(apartment))
    }

    async fn get_bookings(&self, id: ListingId) -> Result<Vec<RawBooking>, ClientError> {
        let bookings = self.contract.getBookings(U256::from(id)).call().await?;
        Ok(bookings.into_iter().map(raw_booking).collect())
    }

    async fn get_reviews(&self, id: ListingId) -> Result<Vec<RawReview>, ClientError> {
        let reviews = self.contract.getReviews(U256::from(id)).call().await?;
        Ok(reviews.into_iter().map(raw_review).collect())
    }

    async fn get_unavailable_dates(&self, id: ListingId) -> Result<Vec<RawNumber>, ClientError> {
        let dates = self.contract.getUnavailableDates(U256::from(id)).call().await?;
        Ok(dates.into_iter().map(RawNumber::from).collect())
    }

    async fn get_qualified_reviewers(&self, id: ListingId) -> Result<Vec<Address>, ClientError> {
        Ok(self
            .contract
            .getQualifiedReviewers(U256::from(id))
            .call()
            .await?)
    }

    async fn security_fee(&self) -> Result<RawNumber, ClientError> {
        let fee = self.contract.securityFee().call().await?;
        Ok(fee.into())
    }

    async fn transact(&self, call: ContractCall) -> Result<TxReceipt, ClientError> {
        let method = call.method();
        let pending = match call {
            ContractCall::CreateListing {
                name,
                description,
                location,
                images,
                rooms,
                price,
            } => {
                self.contract
                    .createAppartment(name, description, location, images, U256::from(rooms), price)
                    .send()
                    .await?
            }
            ContractCall::UpdateListing {
                id,
                name,
                description,
                location,
                images,
                rooms,
                price,
            } => {
                self.contract
                    .updateAppartment(
                        U256::from(id),
                        name,
                        description,
                        location,
                        images,
                        U256::from(rooms),
                        price,
                    )
                    .send()
                    .await?
            }
            ContractCall::DeleteListing { id } => {
                self.contract.deleteAppartment(U256::from(id)).send().await?
            }
            ContractCall::BookListing { id, dates, value } => {
                let dates = dates.into_iter().map(U256::from).collect();
                self.contract
                    .bookApartment(U256::from(id), dates)
                    .value(value)
                    .send()
                    .await?
            }
            ContractCall::CheckIn { id, booking_id } => {
                self.contract
                    .checkInApartment(U256::from(id), U256::from(booking_id))
                    .send()
                    .await?
            }
            ContractCall::RefundBooking { id, booking_id } => {
                self.contract
                    .refundBooking(U256::from(id), U256::from(booking_id))
                    .send()
                    .await?
            }
            ContractCall::AddReview { id, comment } => {
                self.contract.addReview(U256::from(id), comment).send().await?
            }
        };

        let tx_hash = *pending.tx_hash();
        tracing::debug!("{method} submitted as {tx_hash}, waiting for receipt");
        let receipt = pending.get_receipt().await?;
        if !receipt.status() {
            return Err(ClientError::Reverted { tx_hash });
        }
        Ok(TxReceipt {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            from: receipt.from,
        })
    }

    fn signer(&self) -> Address {
        self.signer
    }
}

/// Gateway that signs with an [`InjectedWallet`] over HTTP JSON-RPC.
#[derive(Debug, Clone)]
pub struct WalletGateway {
    config: GatewayConfig,
    wallet: Option<InjectedWallet>,
}

impl WalletGateway {
    pub fn new(config: GatewayConfig, wallet: Option<InjectedWallet>) -> Self {
        Self { config, wallet }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Switch (or disconnect) the active account. Later handles use the new signer.
    pub fn set_wallet(&mut self, wallet: Option<InjectedWallet>) {
        self.wallet = wallet;
    }
}

impl ContractGateway for WalletGateway {
    type Contract = DappBnbHandle;

    fn provider_available(&self) -> bool {
        self.wallet.is_some()
    }

    async fn connect(&self) -> Result<DappBnbHandle, ClientError> {
        let wallet = self.wallet.as_ref().ok_or(ClientError::NoProvider)?;
        Ok(connect_contract(&self.config, wallet))
    }
}
