//! `dappbnb`: command-line front end for the DappBnb rental marketplace.
//!
//! Every read prints normalized JSON. Every write reports pending, success or
//! error, then prints its receipt together with the data re-read after it.

use std::future::Future;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dappbnb_client::config::{
    parse_address, ContractAddressFile, GatewayConfig, CONTRACT_ADDRESS_ENV, CONTRACT_FILE_ENV,
    DEFAULT_RPC_URL, PRIVATE_KEY_ENV, RPC_URL_ENV,
};
use dappbnb_client::draft::ListingDraft;
use dappbnb_client::evm::{InjectedWallet, WalletGateway};
use dappbnb_client::state::{Action, MarketState, Notice};
use dappbnb_client::{ClientError, Marketplace, WriteOutcome};
use dappbnb_common::money::{quote_booking, Ether};
use dappbnb_common::Address;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dappbnb", about = "DappBnb rental marketplace client")]
struct Cli {
    /// JSON-RPC endpoint of the chain.
    #[arg(long, env = RPC_URL_ENV, default_value = DEFAULT_RPC_URL)]
    rpc_url: String,

    /// Marketplace contract address. Takes precedence over --contract-file.
    #[arg(long, env = CONTRACT_ADDRESS_ENV)]
    contract: Option<String>,

    /// Deploy artifact (`{"dappBnbContract": "0x..."}`).
    /// Defaults to <config dir>/dappbnb/contractAddress.json.
    #[arg(long, env = CONTRACT_FILE_ENV)]
    contract_file: Option<PathBuf>,

    /// Hex private key of the signing account.
    #[arg(long, env = PRIVATE_KEY_ENV, hide_env_values = true)]
    private_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List apartments.
    Listings {
        /// Include deleted listings.
        #[arg(long)]
        all: bool,
    },
    /// Show one apartment.
    Listing { id: String },
    /// Bookings of an apartment.
    Bookings { id: String },
    /// Reviews of an apartment.
    Reviews { id: String },
    /// Dates already booked for an apartment.
    Dates { id: String },
    /// Accounts allowed to review an apartment.
    Reviewers { id: String },
    /// Security fee rate in percent of the rent.
    Fee,
    /// Price a stay: rent for the nights plus the security fee.
    Quote { id: String, nights: u64 },
    /// Create an apartment listing.
    Create(CreateArgs),
    /// Edit an apartment listing. Unset fields keep their stored values.
    Update {
        id: String,
        #[command(flatten)]
        changes: UpdateArgs,
    },
    /// Delete an apartment listing.
    Delete { id: String },
    /// Book dates of an apartment.
    Book {
        id: String,
        #[arg(required = true, num_args = 1..)]
        dates: Vec<u64>,
        /// Ether to pay. Quoted from the listing price and fee when omitted.
        #[arg(long)]
        amount: Option<Ether>,
    },
    /// Check in to a booking.
    CheckIn { id: String, booking_id: String },
    /// Cancel a booking and refund the tenant.
    Refund { id: String, booking_id: String },
    /// Review an apartment.
    Review { id: String, text: String },
}

#[derive(Args)]
struct CreateArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    description: String,
    #[arg(long)]
    location: String,
    #[arg(long)]
    rooms: u32,
    /// Image URL; repeat for several.
    #[arg(long = "image", required = true)]
    images: Vec<String>,
    /// Nightly price in ether.
    #[arg(long)]
    price: Ether,
}

#[derive(Args)]
struct UpdateArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    rooms: Option<u32>,
    /// Replaces all images; repeat for several.
    #[arg(long = "image")]
    images: Vec<String>,
    #[arg(long)]
    price: Option<Ether>,
}

impl From<CreateArgs> for ListingDraft {
    fn from(args: CreateArgs) -> Self {
        Self {
            name: args.name,
            description: args.description,
            location: args.location,
            rooms: args.rooms,
            images: args.images,
            price: args.price,
        }
    }
}

impl UpdateArgs {
    fn apply_to(self, draft: &mut ListingDraft) {
        if let Some(name) = self.name {
            draft.name = name;
        }
        if let Some(description) = self.description {
            draft.description = description;
        }
        if let Some(location) = self.location {
            draft.location = location;
        }
        if let Some(rooms) = self.rooms {
            draft.rooms = rooms;
        }
        if !self.images.is_empty() {
            draft.images = self.images;
        }
        if let Some(price) = self.price {
            draft.price = price;
        }
    }
}

fn contract_address(cli: &Cli) -> Result<Address> {
    if let Some(address) = &cli.contract {
        return Ok(parse_address(address)?);
    }
    let path = match &cli.contract_file {
        Some(path) => path.clone(),
        None => dirs::config_dir()
            .context("no config directory; pass --contract or --contract-file")?
            .join("dappbnb")
            .join("contractAddress.json"),
    };
    Ok(ContractAddressFile::load(&path)?.dapp_bnb_contract)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn notify(state: &mut MarketState, notice: Notice) {
    match &notice {
        Notice::Pending(msg) | Notice::Success(msg) => eprintln!("{msg}"),
        Notice::Error(msg) => eprintln!("error: {msg}"),
    }
    state.apply(Action::Notify(notice));
}

#[derive(Serialize)]
struct WriteReport<'a, T> {
    tx_hash: String,
    block_number: Option<u64>,
    from: Address,
    refreshed: &'a T,
}

/// Run one write, reporting its progress through `state`.
async fn write<T>(
    state: &mut MarketState,
    label: &str,
    op: impl Future<Output = Result<WriteOutcome<T>, ClientError>>,
) -> Result<()>
where
    T: Serialize + Into<Action>,
{
    notify(state, Notice::Pending(format!("{label}: approve transaction...")));
    match op.await {
        Ok(outcome) => {
            notify(state, Notice::Success(format!("{label}: confirmed")));
            print_json(&WriteReport {
                tx_hash: outcome.receipt.tx_hash.to_string(),
                block_number: outcome.receipt.block_number,
                from: outcome.receipt.from,
                refreshed: &outcome.refreshed,
            })?;
            state.apply(outcome.refreshed.into());
            Ok(())
        }
        Err(e) => {
            notify(state, Notice::Error(e.to_string()));
            Err(e.into())
        }
    }
}

async fn quote(market: &Marketplace<WalletGateway>, id: &str, nights: u64) -> Result<Ether> {
    let listing = market.listing(id).await?;
    let fee = market.security_fee().await?;
    quote_booking(listing.price, nights, fee).context("booking amount overflows")
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = GatewayConfig::new(&cli.rpc_url, contract_address(&cli)?)?;
    let wallet = cli
        .private_key
        .as_deref()
        .filter(|key| !key.trim().is_empty())
        .map(InjectedWallet::from_private_key)
        .transpose()?;
    match &wallet {
        Some(wallet) => tracing::info!("signing as {}", wallet.address()),
        None => tracing::warn!("no private key configured; ledger calls will fail"),
    }
    tracing::debug!(
        "contract {} via {}",
        config.contract_address,
        config.rpc_url
    );

    let market = Marketplace::new(WalletGateway::new(config, wallet));
    let mut state = MarketState::new();

    match cli.command {
        Command::Listings { all } => {
            state.apply(market.listings().await?.into());
            if all {
                print_json(&state.listings)?;
            } else {
                print_json(&state.visible_listings())?;
            }
        }
        Command::Listing { id } => print_json(&market.listing(&id).await?)?,
        Command::Bookings { id } => print_json(&market.bookings(&id).await?)?,
        Command::Reviews { id } => print_json(&market.reviews(&id).await?)?,
        Command::Dates { id } => print_json(&market.unavailable_dates(&id).await?)?,
        Command::Reviewers { id } => print_json(&market.qualified_reviewers(&id).await?)?,
        Command::Fee => print_json(&market.security_fee().await?)?,
        Command::Quote { id, nights } => print_json(&quote(&market, &id, nights).await?)?,
        Command::Create(args) => {
            let draft = ListingDraft::from(args);
            write(&mut state, "create listing", market.create_listing(&draft)).await?;
        }
        Command::Update { id, changes } => {
            let current = market.listing(&id).await?;
            let mut draft = ListingDraft::from(&current);
            changes.apply_to(&mut draft);
            write(&mut state, "update listing", market.update_listing(&id, &draft)).await?;
        }
        Command::Delete { id } => {
            write(&mut state, "delete listing", market.delete_listing(&id)).await?;
        }
        Command::Book { id, dates, amount } => {
            let amount = match amount {
                Some(amount) => amount,
                None => {
                    let quoted = quote(&market, &id, dates.len() as u64).await?;
                    tracing::info!("paying quoted {quoted} ether for {} nights", dates.len());
                    quoted
                }
            };
            write(&mut state, "book", market.book_listing(&id, &dates, amount)).await?;
        }
        Command::CheckIn { id, booking_id } => {
            write(&mut state, "check in", market.check_in(&id, &booking_id)).await?;
        }
        Command::Refund { id, booking_id } => {
            write(&mut state, "refund", market.refund_booking(&id, &booking_id)).await?;
        }
        Command::Review { id, text } => {
            write(&mut state, "review", market.add_review(&id, &text)).await?;
        }
    }
    Ok(())
}
