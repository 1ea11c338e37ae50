use alloy_primitives::Address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::listing::ListingId;
use crate::money::Ether;
use crate::raw::{RawNumber, ShapeError};

pub type BookingId = u64;

/// One booked date of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub listing_id: ListingId,
    pub tenant: Address,
    /// Booked day, as a millisecond timestamp.
    pub date: u64,
    pub price: Ether,
    pub checked: bool,
    pub cancelled: bool,
}

/// Where a booking sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    /// Paid for, tenant has not arrived yet.
    Reserved,
    CheckedIn,
    /// Refunded to the tenant.
    Cancelled,
}

impl Booking {
    pub fn status(&self) -> BookingStatus {
        if self.cancelled {
            BookingStatus::Cancelled
        } else if self.checked {
            BookingStatus::CheckedIn
        } else {
            BookingStatus::Reserved
        }
    }

    /// Only reserved bookings can still be checked into or refunded.
    pub fn is_open(&self) -> bool {
        self.status() == BookingStatus::Reserved
    }

    pub fn day(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.date)
            .ok()
            .and_then(DateTime::from_timestamp_millis)
    }
}

/// A booking tuple as the contract returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBooking {
    pub id: RawNumber,
    #[serde(alias = "listing_id")]
    pub aid: RawNumber,
    pub tenant: Address,
    pub date: RawNumber,
    pub price: RawNumber,
    pub checked: bool,
    pub cancelled: bool,
}

impl TryFrom<RawBooking> for Booking {
    type Error = ShapeError;

    fn try_from(raw: RawBooking) -> Result<Self, Self::Error> {
        Ok(Booking {
            id: raw.id.to_u64("id")?,
            listing_id: raw.aid.to_u64("aid")?,
            tenant: raw.tenant,
            date: raw.date.to_u64("date")?,
            price: raw.price.to_ether("price")?,
            checked: raw.checked,
            cancelled: raw.cancelled,
        })
    }
}

/// Normalize the contract's unavailable-dates list.
pub fn normalize_dates(raw: Vec<RawNumber>) -> Result<Vec<u64>, ShapeError> {
    raw.iter().map(|d| d.to_u64("date")).collect()
}
