//! Marketplace operations: one method per use case.
//!
//! Reads validate their identifier, fetch through a fresh contract handle and
//! normalize. Writes check for a wallet, validate, submit, wait for finality
//! and then re-fetch the collection they made stale; the re-fetched data is
//! part of the result. A failed write never re-fetches.

use dappbnb_common::booking::{normalize_dates, Booking, BookingId};
use dappbnb_common::listing::{Listing, ListingId};
use dappbnb_common::money::Ether;
use dappbnb_common::raw::normalize_all;
use dappbnb_common::review::Review;
use dappbnb_common::Address;

use crate::draft::ListingDraft;
use crate::error::ClientError;
use crate::gateway::{ContractCall, ContractGateway, MarketContract, TxReceipt};
use crate::id::RawId;

/// Result of a confirmed write: its receipt plus the collection re-read after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome<T> {
    pub receipt: TxReceipt,
    pub refreshed: T,
}

pub struct Marketplace<G> {
    gateway: G,
}

impl<G: ContractGateway> Marketplace<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn gateway_mut(&mut self) -> &mut G {
        &mut self.gateway
    }

    // ─── Reads ──────────────────────────────────────────────────────────────

    pub async fn listings(&self) -> Result<Vec<Listing>, ClientError> {
        let contract = self.gateway.connect().await?;
        let raw = contract.get_apartments().await?;
        tracing::debug!("fetched {} listings", raw.len());
        Ok(normalize_all(raw)?)
    }

    pub async fn listing(&self, id: impl Into<RawId>) -> Result<Listing, ClientError> {
        let id = id.into().validate()?;
        let contract = self.gateway.connect().await?;
        let raw = contract.get_apartment(id).await?;
        Ok(Listing::try_from(raw)?)
    }

    pub async fn bookings(&self, id: impl Into<RawId>) -> Result<Vec<Booking>, ClientError> {
        let id = id.into().validate()?;
        let contract = self.gateway.connect().await?;
        let raw = contract.get_bookings(id).await?;
        tracing::debug!("fetched {} bookings for listing {id}", raw.len());
        Ok(normalize_all(raw)?)
    }

    pub async fn reviews(&self, id: impl Into<RawId>) -> Result<Vec<Review>, ClientError> {
        let id = id.into().validate()?;
        let contract = self.gateway.connect().await?;
        let raw = contract.get_reviews(id).await?;
        Ok(normalize_all(raw)?)
    }

    /// Dates already booked for a listing.
    pub async fn unavailable_dates(&self, id: impl Into<RawId>) -> Result<Vec<u64>, ClientError> {
        let id = id.into().validate()?;
        let contract = self.gateway.connect().await?;
        let raw = contract.get_unavailable_dates(id).await?;
        Ok(normalize_dates(raw)?)
    }

    /// Accounts that stayed at the listing and may review it.
    pub async fn qualified_reviewers(
        &self,
        id: impl Into<RawId>,
    ) -> Result<Vec<Address>, ClientError> {
        let id = id.into().validate()?;
        let contract = self.gateway.connect().await?;
        contract.get_qualified_reviewers(id).await
    }

    /// Security fee rate, in percent of the rent.
    pub async fn security_fee(&self) -> Result<u64, ClientError> {
        let contract = self.gateway.connect().await?;
        let fee = contract.security_fee().await?;
        Ok(fee.to_u64("securityFee")?)
    }

    // ─── Writes ─────────────────────────────────────────────────────────────

    fn require_provider(&self) -> Result<(), ClientError> {
        if self.gateway.provider_available() {
            Ok(())
        } else {
            Err(ClientError::NoProvider)
        }
    }

    async fn submit(&self, call: ContractCall) -> Result<TxReceipt, ClientError> {
        let method = call.method();
        let contract = self.gateway.connect().await?;
        tracing::info!("submitting {method} as {}", contract.signer());
        match contract.transact(call).await {
            Ok(receipt) => {
                tracing::info!("{method} confirmed in tx {}", receipt.tx_hash);
                Ok(receipt)
            }
            Err(e) => {
                tracing::warn!("{method} failed: {e}");
                Err(e)
            }
        }
    }

    pub async fn create_listing(
        &self,
        draft: &ListingDraft,
    ) -> Result<WriteOutcome<Vec<Listing>>, ClientError> {
        self.require_provider()?;
        draft.validate()?;
        let receipt = self
            .submit(ContractCall::CreateListing {
                name: draft.name.clone(),
                description: draft.description.clone(),
                location: draft.location.clone(),
                images: draft.joined_images(),
                rooms: draft.rooms,
                price: draft.price.wei(),
            })
            .await?;
        let refreshed = self.listings().await?;
        Ok(WriteOutcome { receipt, refreshed })
    }

    pub async fn update_listing(
        &self,
        id: impl Into<RawId>,
        draft: &ListingDraft,
    ) -> Result<WriteOutcome<Listing>, ClientError> {
        self.require_provider()?;
        let id = id.into().validate()?;
        draft.validate()?;
        let receipt = self
            .submit(ContractCall::UpdateListing {
                id,
                name: draft.name.clone(),
                description: draft.description.clone(),
                location: draft.location.clone(),
                images: draft.joined_images(),
                rooms: draft.rooms,
                price: draft.price.wei(),
            })
            .await?;
        let refreshed = self.listing(id).await?;
        Ok(WriteOutcome { receipt, refreshed })
    }

    pub async fn delete_listing(
        &self,
        id: impl Into<RawId>,
    ) -> Result<WriteOutcome<Vec<Listing>>, ClientError> {
        self.require_provider()?;
        let id = id.into().validate()?;
        let receipt = self.submit(ContractCall::DeleteListing { id }).await?;
        let refreshed = self.listings().await?;
        Ok(WriteOutcome { receipt, refreshed })
    }

    /// Book `dates` of a listing, paying `amount` (rent plus security fee).
    pub async fn book_listing(
        &self,
        id: impl Into<RawId>,
        dates: &[u64],
        amount: Ether,
    ) -> Result<WriteOutcome<Vec<u64>>, ClientError> {
        self.require_provider()?;
        let id = id.into().validate()?;
        if dates.is_empty() {
            return Err(ClientError::NoDates);
        }
        let receipt = self
            .submit(ContractCall::BookListing {
                id,
                dates: dates.to_vec(),
                value: amount.wei(),
            })
            .await?;
        let refreshed = self.unavailable_dates(id).await?;
        Ok(WriteOutcome { receipt, refreshed })
    }

    pub async fn check_in(
        &self,
        id: impl Into<RawId>,
        booking_id: impl Into<RawId>,
    ) -> Result<WriteOutcome<Vec<Booking>>, ClientError> {
        self.require_provider()?;
        let id = id.into().validate()?;
        let booking_id: BookingId = booking_id.into().validate()?;
        let receipt = self.submit(ContractCall::CheckIn { id, booking_id }).await?;
        let refreshed = self.bookings(id).await?;
        Ok(WriteOutcome { receipt, refreshed })
    }

    pub async fn refund_booking(
        &self,
        id: impl Into<RawId>,
        booking_id: impl Into<RawId>,
    ) -> Result<WriteOutcome<Vec<Booking>>, ClientError> {
        self.require_provider()?;
        let id = id.into().validate()?;
        let booking_id: BookingId = booking_id.into().validate()?;
        let receipt = self
            .submit(ContractCall::RefundBooking { id, booking_id })
            .await?;
        let refreshed = self.bookings(id).await?;
        Ok(WriteOutcome { receipt, refreshed })
    }

    pub async fn add_review(
        &self,
        id: impl Into<RawId>,
        text: &str,
    ) -> Result<WriteOutcome<Vec<Review>>, ClientError> {
        self.require_provider()?;
        let id: ListingId = id.into().validate()?;
        if text.trim().is_empty() {
            return Err(ClientError::MissingField("text"));
        }
        let receipt = self
            .submit(ContractCall::AddReview {
                id,
                comment: text.to_string(),
            })
            .await?;
        let refreshed = self.reviews(id).await?;
        Ok(WriteOutcome { receipt, refreshed })
    }
}
