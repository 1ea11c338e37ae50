use alloy_primitives::Address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Ether;
use crate::raw::{RawImages, RawNumber, ShapeError};

/// Listing identifier assigned by the contract.
pub type ListingId = u64;

/// A rental listing ("apartment") as held by the contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub name: String,
    pub owner: Address,
    pub description: String,
    pub location: String,
    /// Nightly price.
    pub price: Ether,
    pub rooms: u32,
    pub images: Vec<String>,
    /// Logically deleted; the contract never removes listings.
    pub deleted: bool,
    pub booked: bool,
    /// Creation time in milliseconds since the epoch.
    pub timestamp: u64,
}

impl Listing {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.timestamp)
            .ok()
            .and_then(DateTime::from_timestamp_millis)
    }

    /// First image, used as the cover in listing grids.
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// A listing tuple exactly as the contract returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawListing {
    pub id: RawNumber,
    pub name: String,
    pub owner: Address,
    pub description: String,
    pub location: String,
    pub price: RawNumber,
    pub rooms: RawNumber,
    pub images: RawImages,
    pub deleted: bool,
    pub booked: bool,
    pub timestamp: RawNumber,
}

impl TryFrom<RawListing> for Listing {
    type Error = ShapeError;

    fn try_from(raw: RawListing) -> Result<Self, Self::Error> {
        Ok(Listing {
            id: raw.id.to_u64("id")?,
            name: raw.name,
            owner: raw.owner,
            description: raw.description,
            location: raw.location,
            price: raw.price.to_ether("price")?,
            rooms: raw.rooms.to_u32("rooms")?,
            images: raw.images.into_list(),
            deleted: raw.deleted,
            booked: raw.booked,
            timestamp: raw.timestamp.to_u64("timestamp")?,
        })
    }
}
