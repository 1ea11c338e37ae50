use dappbnb_common::listing::Listing;
use dappbnb_common::money::Ether;
use dappbnb_common::raw::{join_images, IMAGE_DELIMITER};
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Listing fields a host fills in when creating or editing a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingDraft {
    pub name: String,
    pub description: String,
    pub location: String,
    pub rooms: u32,
    pub images: Vec<String>,
    /// Nightly price.
    pub price: Ether,
}

impl ListingDraft {
    /// Every field is required; a zero price or room count counts as missing.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.name.trim().is_empty() {
            return Err(ClientError::MissingField("name"));
        }
        if self.description.trim().is_empty() {
            return Err(ClientError::MissingField("description"));
        }
        if self.location.trim().is_empty() {
            return Err(ClientError::MissingField("location"));
        }
        if self.rooms == 0 {
            return Err(ClientError::MissingField("rooms"));
        }
        if self.price.is_zero() {
            return Err(ClientError::MissingField("price"));
        }
        if self.images.iter().all(|i| i.trim().is_empty()) {
            return Err(ClientError::MissingField("images"));
        }
        if let Some(bad) = self.images.iter().find(|i| i.contains(IMAGE_DELIMITER)) {
            return Err(ClientError::InvalidImage(bad.clone()));
        }
        Ok(())
    }

    /// Image references in the ledger's comma-joined form, blanks skipped.
    pub fn joined_images(&self) -> String {
        let images: Vec<String> = self
            .images
            .iter()
            .map(|i| i.trim())
            .filter(|i| !i.is_empty())
            .map(str::to_string)
            .collect();
        join_images(&images)
    }
}

/// Start an edit from the listing as currently stored.
impl From<&Listing> for ListingDraft {
    fn from(listing: &Listing) -> Self {
        Self {
            name: listing.name.clone(),
            description: listing.description.clone(),
            location: listing.location.clone(),
            rooms: listing.rooms,
            images: listing.images.clone(),
            price: listing.price,
        }
    }
}
