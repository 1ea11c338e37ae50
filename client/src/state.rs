use dappbnb_common::booking::Booking;
use dappbnb_common::listing::Listing;
use dappbnb_common::review::Review;
use dappbnb_common::Address;

/// Ledger-sourced state a front end renders from.
///
/// Owned by the caller and updated only through [`reduce`]; nothing in this
/// crate keeps a global copy.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MarketState {
    pub listings: Vec<Listing>,
    /// Listing currently open in a detail view.
    pub listing: Option<Listing>,
    pub bookings: Vec<Booking>,
    /// Unavailable dates of the open listing.
    pub timestamps: Vec<u64>,
    pub reviews: Vec<Review>,
    pub qualified_reviewers: Vec<Address>,
    /// Percent of the rent.
    pub security_fee: Option<u64>,
    /// Status of the last submitted transaction.
    pub notice: Option<Notice>,
}

/// Pending / success / error status shown for one transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    Pending(String),
    Success(String),
    Error(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    SetListings(Vec<Listing>),
    SetListing(Listing),
    SetBookings(Vec<Booking>),
    SetTimestamps(Vec<u64>),
    SetReviews(Vec<Review>),
    SetQualifiedReviewers(Vec<Address>),
    SetSecurityFee(u64),
    Notify(Notice),
    ClearNotice,
}

/// Apply one action, producing the next state.
pub fn reduce(mut state: MarketState, action: Action) -> MarketState {
    state.apply(action);
    state
}

impl MarketState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::SetListings(listings) => self.listings = listings,
            Action::SetListing(listing) => {
                // Keep the grid in step with the detail view.
                if let Some(slot) = self.listings.iter_mut().find(|l| l.id == listing.id) {
                    *slot = listing.clone();
                }
                self.listing = Some(listing);
            }
            Action::SetBookings(bookings) => self.bookings = bookings,
            Action::SetTimestamps(timestamps) => self.timestamps = timestamps,
            Action::SetReviews(reviews) => self.reviews = reviews,
            Action::SetQualifiedReviewers(reviewers) => self.qualified_reviewers = reviewers,
            Action::SetSecurityFee(fee) => self.security_fee = Some(fee),
            Action::Notify(notice) => self.notice = Some(notice),
            Action::ClearNotice => self.notice = None,
        }
    }

    /// Listings that have not been deleted, for display.
    pub fn visible_listings(&self) -> Vec<&Listing> {
        self.listings.iter().filter(|l| !l.deleted).collect()
    }

    pub fn is_date_available(&self, date: u64) -> bool {
        !self.timestamps.contains(&date)
    }

    pub fn can_review(&self, account: &Address) -> bool {
        self.qualified_reviewers.contains(account)
    }
}

impl From<Vec<Listing>> for Action {
    fn from(listings: Vec<Listing>) -> Self {
        Action::SetListings(listings)
    }
}

impl From<Listing> for Action {
    fn from(listing: Listing) -> Self {
        Action::SetListing(listing)
    }
}

impl From<Vec<Booking>> for Action {
    fn from(bookings: Vec<Booking>) -> Self {
        Action::SetBookings(bookings)
    }
}

impl From<Vec<u64>> for Action {
    fn from(timestamps: Vec<u64>) -> Self {
        Action::SetTimestamps(timestamps)
    }
}

impl From<Vec<Review>> for Action {
    fn from(reviews: Vec<Review>) -> Self {
        Action::SetReviews(reviews)
    }
}
