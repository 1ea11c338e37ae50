use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::listing::ListingId;
use crate::raw::{RawNumber, ShapeError};

/// A guest review left on a listing. Reviews are append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: u64,
    pub listing_id: ListingId,
    pub author: Address,
    pub text: String,
    pub timestamp: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawReview {
    pub id: RawNumber,
    #[serde(alias = "listing_id")]
    pub aid: RawNumber,
    #[serde(rename = "reviewText", alias = "text")]
    pub review_text: String,
    pub timestamp: RawNumber,
    #[serde(alias = "author")]
    pub owner: Address,
}

impl TryFrom<RawReview> for Review {
    type Error = ShapeError;

    fn try_from(raw: RawReview) -> Result<Self, Self::Error> {
        Ok(Review {
            id: raw.id.to_u64("id")?,
            listing_id: raw.aid.to_u64("aid")?,
            author: raw.owner,
            text: raw.review_text,
            timestamp: raw.timestamp.to_u64("timestamp")?,
        })
    }
}
