#![cfg(feature = "ledger-tests")]

//! Cumulative ledger tests.
//!
//! Runs against a development chain with the DappBnb contract deployed. All
//! steps run in order inside one `#[tokio::test]`; each step relies on the
//! state left by the previous ones.

use dappbnb_client::ClientError;
use dappbnb_common::booking::BookingStatus;
use dappbnb_common::money::quote_booking;

use dappbnb_ledger_integration::{
    future_dates, make_draft, market_for, market_without_wallet, unique_name, GUEST_KEY, HOST_KEY,
};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn cumulative_ledger_tests() {
    tracing_subscriber::fmt::try_init().ok();

    let host = market_for(HOST_KEY);
    let guest = market_for(GUEST_KEY);
    let name = unique_name("Harbour view");

    // ═══════════════════════════════════════════════════════════════════
    // Step 1: no wallet → NoProvider, nothing submitted
    // ═══════════════════════════════════════════════════════════════════
    println!("── Step 1: write_without_wallet_is_rejected ──");
    {
        let anonymous = market_without_wallet();
        let err = anonymous.create_listing(&make_draft(&name)).await.unwrap_err();
        assert!(matches!(err, ClientError::NoProvider), "{err:?}");
    }

    // ═══════════════════════════════════════════════════════════════════
    // Step 2: host creates a listing; refreshed listings contain it
    // ═══════════════════════════════════════════════════════════════════
    println!("── Step 2: create_listing ──");
    let listing = {
        let outcome = host.create_listing(&make_draft(&name)).await.unwrap();
        let listing = outcome
            .refreshed
            .iter()
            .find(|l| l.name == name)
            .cloned()
            .expect("created listing should be in the refreshed list");
        assert_eq!(listing.rooms, 2);
        assert_eq!(listing.images.len(), 2);
        assert_eq!(listing.price.to_string(), "0.1");
        assert_eq!(outcome.receipt.from, listing.owner);
        listing
    };

    // ═══════════════════════════════════════════════════════════════════
    // Step 3: host edits the listing
    // ═══════════════════════════════════════════════════════════════════
    println!("── Step 3: update_listing ──");
    {
        let mut draft = dappbnb_client::draft::ListingDraft::from(&listing);
        draft.rooms = 3;
        let outcome = host.update_listing(listing.id, &draft).await.unwrap();
        assert_eq!(outcome.refreshed.id, listing.id);
        assert_eq!(outcome.refreshed.rooms, 3);
        assert_eq!(outcome.refreshed.name, name);
    }

    // ═══════════════════════════════════════════════════════════════════
    // Step 4: guest books two nights at the quoted amount
    // ═══════════════════════════════════════════════════════════════════
    println!("── Step 4: book_listing ──");
    let dates = future_dates(2, 2);
    {
        let fee = guest.security_fee().await.unwrap();
        let amount = quote_booking(listing.price, dates.len() as u64, fee).unwrap();
        let outcome = guest.book_listing(listing.id, &dates, amount).await.unwrap();
        for date in &dates {
            assert!(outcome.refreshed.contains(date), "{date} should be unavailable");
        }
        assert_eq!(outcome.refreshed, guest.unavailable_dates(listing.id).await.unwrap());
    }

    // ═══════════════════════════════════════════════════════════════════
    // Step 5: guest checks in to the first night and may then review
    // ═══════════════════════════════════════════════════════════════════
    println!("── Step 5: check_in ──");
    {
        let bookings = guest.bookings(listing.id).await.unwrap();
        assert_eq!(bookings.len(), 2);
        assert!(bookings.iter().all(|b| b.status() == BookingStatus::Reserved));

        let outcome = guest.check_in(listing.id, bookings[0].id).await.unwrap();
        assert_eq!(outcome.refreshed[0].status(), BookingStatus::CheckedIn);

        let reviewers = guest.qualified_reviewers(listing.id).await.unwrap();
        assert!(reviewers.contains(&outcome.receipt.from));
    }

    // ═══════════════════════════════════════════════════════════════════
    // Step 6: guest reviews the stay
    // ═══════════════════════════════════════════════════════════════════
    println!("── Step 6: add_review ──");
    {
        let outcome = guest
            .add_review(listing.id, "Spotless, great light.")
            .await
            .unwrap();
        let review = outcome.refreshed.last().expect("review should be stored");
        assert_eq!(review.text, "Spotless, great light.");
        assert_eq!(review.listing_id, listing.id);
    }

    // ═══════════════════════════════════════════════════════════════════
    // Step 7: guest cancels the second night
    // ═══════════════════════════════════════════════════════════════════
    println!("── Step 7: refund_booking ──");
    {
        let outcome = guest.refund_booking(listing.id, 1u64).await.unwrap();
        assert_eq!(outcome.refreshed[1].status(), BookingStatus::Cancelled);
    }

    // ═══════════════════════════════════════════════════════════════════
    // Step 8: host deletes the listing
    // ═══════════════════════════════════════════════════════════════════
    println!("── Step 8: delete_listing ──");
    {
        let outcome = host.delete_listing(listing.id).await.unwrap();
        assert!(outcome
            .refreshed
            .iter()
            .all(|l| l.id != listing.id || l.deleted));
    }
}
