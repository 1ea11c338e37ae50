use dappbnb_common::booking::{BookingId, RawBooking};
use dappbnb_common::listing::{ListingId, RawListing};
use dappbnb_common::raw::RawNumber;
use dappbnb_common::review::RawReview;
use dappbnb_common::{Address, TxHash, U256};

use crate::error::ClientError;

/// A state-changing contract call, with amounts already in wei.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractCall {
    CreateListing {
        name: String,
        description: String,
        location: String,
        /// Comma-joined image references.
        images: String,
        rooms: u32,
        price: U256,
    },
    UpdateListing {
        id: ListingId,
        name: String,
        description: String,
        location: String,
        images: String,
        rooms: u32,
        price: U256,
    },
    DeleteListing {
        id: ListingId,
    },
    /// Payable: `value` is sent along with the call.
    BookListing {
        id: ListingId,
        dates: Vec<u64>,
        value: U256,
    },
    CheckIn {
        id: ListingId,
        booking_id: BookingId,
    },
    RefundBooking {
        id: ListingId,
        booking_id: BookingId,
    },
    AddReview {
        id: ListingId,
        comment: String,
    },
}

impl ContractCall {
    /// Contract method name, for logs.
    pub fn method(&self) -> &'static str {
        match self {
            Self::CreateListing { .. } => "createAppartment",
            Self::UpdateListing { .. } => "updateAppartment",
            Self::DeleteListing { .. } => "deleteAppartment",
            Self::BookListing { .. } => "bookApartment",
            Self::CheckIn { .. } => "checkInApartment",
            Self::RefundBooking { .. } => "refundBooking",
            Self::AddReview { .. } => "addReview",
        }
    }
}

/// Receipt of a transaction that reached finality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub from: Address,
}

/// A signer-bound handle to the deployed marketplace contract.
///
/// Reads return the ledger's records untouched; shaping them is the
/// caller's job. `transact` resolves only once the transaction is final.
#[allow(async_fn_in_trait)]
pub trait MarketContract {
    async fn get_apartments(&self) -> Result<Vec<RawListing>, ClientError>;

    async fn get_apartment(&self, id: ListingId) -> Result<RawListing, ClientError>;

    async fn get_bookings(&self, id: ListingId) -> Result<Vec<RawBooking>, ClientError>;

    async fn get_reviews(&self, id: ListingId) -> Result<Vec<RawReview>, ClientError>;

    async fn get_unavailable_dates(&self, id: ListingId) -> Result<Vec<RawNumber>, ClientError>;

    async fn get_qualified_reviewers(&self, id: ListingId) -> Result<Vec<Address>, ClientError>;

    /// Security fee as a percentage of the rent.
    async fn security_fee(&self) -> Result<RawNumber, ClientError>;

    /// Submit a write and wait for its receipt.
    async fn transact(&self, call: ContractCall) -> Result<TxReceipt, ClientError>;

    /// Account the handle signs with.
    fn signer(&self) -> Address;
}

/// Produces contract handles from whatever wallet the environment provides.
///
/// Implementations must not cache handles: `connect` derives a fresh one
/// each time so it always reflects the current signer.
#[allow(async_fn_in_trait)]
pub trait ContractGateway {
    type Contract: MarketContract;

    /// Whether a wallet provider is present at all.
    fn provider_available(&self) -> bool;

    /// Fails with [`ClientError::NoProvider`] when no wallet is present.
    async fn connect(&self) -> Result<Self::Contract, ClientError>;
}
