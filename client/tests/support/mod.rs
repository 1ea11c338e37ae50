//! In-memory stand-in for the deployed contract.
//!
//! Records every connect, read and write so tests can assert exactly which
//! remote calls an operation made.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use dappbnb_client::gateway::{ContractCall, ContractGateway, MarketContract, TxReceipt};
use dappbnb_client::ClientError;
use dappbnb_common::booking::RawBooking;
use dappbnb_common::listing::{ListingId, RawListing};
use dappbnb_common::raw::{RawImages, RawNumber};
use dappbnb_common::review::RawReview;
use dappbnb_common::{Address, TxHash, U256};

pub const HOST: Address = Address::new([0xaa; 20]);
pub const GUEST: Address = Address::new([0xbb; 20]);

#[derive(Default)]
pub struct Ledger {
    pub listings: Vec<RawListing>,
    pub bookings: BTreeMap<ListingId, Vec<RawBooking>>,
    pub reviews: BTreeMap<ListingId, Vec<RawReview>>,
    pub dates: BTreeMap<ListingId, Vec<RawNumber>>,
    pub reviewers: BTreeMap<ListingId, Vec<Address>>,
    pub fee: u64,
    /// When set, every write is rejected with this message.
    pub reject_writes: Option<String>,
    pub connects: usize,
    /// Remote calls in order, e.g. `getUnavailableDates(7)`.
    pub calls: Vec<String>,
    pub submitted: Vec<ContractCall>,
}

impl Ledger {
    pub fn raw_listing(id: u64, name: &str) -> RawListing {
        RawListing {
            id: RawNumber::Int(id),
            name: name.to_string(),
            owner: HOST,
            description: format!("{name} description"),
            location: "Lisbon".into(),
            price: RawNumber::Text("1000000000000000000".into()),
            rooms: RawNumber::Text("3".into()),
            images: RawImages::Joined("a.png,b.png".into()),
            deleted: false,
            booked: false,
            timestamp: RawNumber::Int(1_700_000_000_000),
        }
    }

    fn apply(&mut self, call: &ContractCall) {
        match call {
            ContractCall::CreateListing {
                name,
                description,
                location,
                images,
                rooms,
                price,
            } => {
                let id = self.listings.len() as u64;
                self.listings.push(RawListing {
                    id: RawNumber::Int(id),
                    name: name.clone(),
                    owner: HOST,
                    description: description.clone(),
                    location: location.clone(),
                    price: RawNumber::from(*price),
                    rooms: RawNumber::Int((*rooms).into()),
                    images: RawImages::Joined(images.clone()),
                    deleted: false,
                    booked: false,
                    timestamp: RawNumber::Int(1_700_000_000_000),
                });
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
                if let Some(l) = self.listings.get_mut(*id as usize) {
                    l.name = name.clone();
                    l.description = description.clone();
                    l.location = location.clone();
                    l.images = RawImages::Joined(images.clone());
                    l.rooms = RawNumber::Int((*rooms).into());
                    l.price = RawNumber::from(*price);
                }
            }
            ContractCall::DeleteListing { id } => {
                if let Some(l) = self.listings.get_mut(*id as usize) {
                    l.deleted = true;
                }
            }
            ContractCall::BookListing { id, dates, value } => {
                let per_night = *value / U256::from(dates.len() as u64);
                let bookings = self.bookings.entry(*id).or_default();
                for date in dates {
                    bookings.push(RawBooking {
                        id: RawNumber::Int(bookings.len() as u64),
                        aid: RawNumber::Int(*id),
                        tenant: GUEST,
                        date: RawNumber::Int(*date),
                        price: RawNumber::from(per_night),
                        checked: false,
                        cancelled: false,
                    });
                }
                self.dates
                    .entry(*id)
                    .or_default()
                    .extend(dates.iter().map(|d| RawNumber::Text(d.to_string())));
            }
            ContractCall::CheckIn { id, booking_id } => {
                if let Some(b) = self
                    .bookings
                    .get_mut(id)
                    .and_then(|b| b.get_mut(*booking_id as usize))
                {
                    b.checked = true;
                }
                self.reviewers.entry(*id).or_default().push(GUEST);
            }
            ContractCall::RefundBooking { id, booking_id } => {
                if let Some(b) = self
                    .bookings
                    .get_mut(id)
                    .and_then(|b| b.get_mut(*booking_id as usize))
                {
                    b.cancelled = true;
                }
            }
            ContractCall::AddReview { id, comment } => {
                let reviews = self.reviews.entry(*id).or_default();
                reviews.push(RawReview {
                    id: RawNumber::Int(reviews.len() as u64),
                    aid: RawNumber::Int(*id),
                    review_text: comment.clone(),
                    timestamp: RawNumber::Int(1_700_000_000_000),
                    owner: GUEST,
                });
            }
        }
    }
}

#[derive(Clone)]
pub struct StubGateway {
    pub ledger: Arc<Mutex<Ledger>>,
    pub provider: bool,
}

impl StubGateway {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger: Arc::new(Mutex::new(ledger)),
            provider: true,
        }
    }

    pub fn without_provider(ledger: Ledger) -> Self {
        Self {
            provider: false,
            ..Self::new(ledger)
        }
    }

    pub fn connects(&self) -> usize {
        self.ledger.lock().unwrap().connects
    }

    pub fn calls(&self) -> Vec<String> {
        self.ledger.lock().unwrap().calls.clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    pub fn submitted(&self) -> Vec<ContractCall> {
        self.ledger.lock().unwrap().submitted.clone()
    }
}

pub struct StubContract {
    ledger: Arc<Mutex<Ledger>>,
}

impl StubContract {
    fn record(&self, call: String) -> std::sync::MutexGuard<'_, Ledger> {
        let mut ledger = self.ledger.lock().unwrap();
        ledger.calls.push(call);
        ledger
    }
}

impl MarketContract for StubContract {
    async fn get_apartments(&self) -> Result<Vec<RawListing>, ClientError> {
        let ledger = self.record("getApartments()".into());
        Ok(ledger.listings.clone())
    }

    async fn get_apartment(&self, id: ListingId) -> Result<RawListing, ClientError> {
        let ledger = self.record(format!("getApartment({id})"));
        let found = ledger.listings.get(id as usize).cloned();
        found.ok_or_else(|| ClientError::Remote("execution reverted: Apartment not found".into()))
    }

    async fn get_bookings(&self, id: ListingId) -> Result<Vec<RawBooking>, ClientError> {
        let ledger = self.record(format!("getBookings({id})"));
        Ok(ledger.bookings.get(&id).cloned().unwrap_or_default())
    }

    async fn get_reviews(&self, id: ListingId) -> Result<Vec<RawReview>, ClientError> {
        let ledger = self.record(format!("getReviews({id})"));
        Ok(ledger.reviews.get(&id).cloned().unwrap_or_default())
    }

    async fn get_unavailable_dates(&self, id: ListingId) -> Result<Vec<RawNumber>, ClientError> {
        let ledger = self.record(format!("getUnavailableDates({id})"));
        Ok(ledger.dates.get(&id).cloned().unwrap_or_default())
    }

    async fn get_qualified_reviewers(&self, id: ListingId) -> Result<Vec<Address>, ClientError> {
        let ledger = self.record(format!("getQualifiedReviewers({id})"));
        Ok(ledger.reviewers.get(&id).cloned().unwrap_or_default())
    }

    async fn security_fee(&self) -> Result<RawNumber, ClientError> {
        let ledger = self.record("securityFee()".into());
        Ok(RawNumber::Text(ledger.fee.to_string()))
    }

    async fn transact(&self, call: ContractCall) -> Result<TxReceipt, ClientError> {
        let mut ledger = self.record(format!("{}()", call.method()));
        if let Some(reason) = ledger.reject_writes.clone() {
            return Err(ClientError::Remote(reason));
        }
        ledger.apply(&call);
        ledger.submitted.push(call);
        let nonce = ledger.submitted.len() as u8;
        Ok(TxReceipt {
            tx_hash: TxHash::repeat_byte(nonce),
            block_number: Some(nonce.into()),
            from: GUEST,
        })
    }

    fn signer(&self) -> Address {
        GUEST
    }
}

impl ContractGateway for StubGateway {
    type Contract = StubContract;

    fn provider_available(&self) -> bool {
        self.provider
    }

    async fn connect(&self) -> Result<StubContract, ClientError> {
        if !self.provider {
            return Err(ClientError::NoProvider);
        }
        self.ledger.lock().unwrap().connects += 1;
        Ok(StubContract {
            ledger: Arc::clone(&self.ledger),
        })
    }
}
