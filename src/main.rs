//! Market Adapter CLI
//!
//! Derives addresses, decodes live accounts, quotes stakes and assembles
//! unsigned bet transactions. Output is JSON on stdout; logs go to stderr.

#![deny(unused_imports)]
#![deny(unused_mut)]
#![deny(unused_variables)]
#![warn(unused_must_use)]

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use market_adapter::accounts::{
    AccountKind, AccountRecord, Affiliate, CreatorProfile, DisputeRecord, Market, ProgramConfig,
    RaceMarket, RacePosition, UserPosition, Whitelist,
};
use market_adapter::config::AdapterConfig;
use market_adapter::instructions::{InstructionEncoder, MarketInstruction, Opcode, PlaceBet};
use market_adapter::pda::DerivedAddress;
use market_adapter::quote::{self, PariMutuelQuoter};
use market_adapter::reader::MarketReader;
use market_adapter::transport::{RpcTransport, Transport};
use market_adapter::tx_builder::{simulate_envelope, submit_signed, TransactionAssembler};
use market_adapter::types::sol_to_lamports;
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "market-adapter.toml", env = "MARKET_ADAPTER_CONFIG")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a program-derived address and its bump
    Derive {
        #[command(subcommand)]
        target: Target,
    },
    /// Fetch and decode an account
    Decode {
        #[command(subcommand)]
        target: DecodeTarget,
    },
    /// Project the payout of a stake
    Quote {
        #[command(subcommand)]
        target: QuoteTarget,
    },
    /// Assemble an unsigned place-bet transaction
    BuildBet {
        #[arg(long)]
        market_id: u64,
        #[arg(long, value_enum)]
        side: Side,
        /// Stake in SOL
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        bettor: Pubkey,
        /// Also dry-run the envelope
        #[arg(long)]
        simulate: bool,
    },
    /// Dry-run a base64 envelope
    Simulate {
        #[arg(long)]
        envelope: String,
    },
    /// Relay a base64 envelope that was signed elsewhere
    Submit {
        #[arg(long)]
        envelope: String,
    },
    /// List instruction opcodes and account kind tags
    Tags,
}

/// Accounts addressable by their seeds
#[derive(Subcommand, Debug, Clone)]
enum Target {
    Config,
    Market { market_id: u64 },
    Position { market_id: u64, owner: Pubkey },
    RaceMarket { market_id: u64 },
    RacePosition { market_id: u64, owner: Pubkey },
    Whitelist { market_id: u64 },
    RaceWhitelist { market_id: u64 },
    Affiliate { code: String },
    CreatorProfile { owner: Pubkey },
    Dispute { market_id: u64 },
    CouncilVote { market_id: u64, voter: Pubkey },
}

#[derive(Subcommand, Debug)]
enum DecodeTarget {
    /// Decode the account behind a derivable address
    #[command(flatten)]
    Account(Target),
    /// Decode any program account by address, identifying its kind by tag
    Address { address: Pubkey },
    /// All binary markets, skipping undecodable accounts
    ListMarkets,
    /// All race markets
    ListRaceMarkets,
    /// Positions held by an owner
    Positions { owner: Pubkey },
}

#[derive(Subcommand, Debug)]
enum QuoteTarget {
    /// Quote against explicit pools (SOL)
    Binary {
        #[arg(long)]
        yes_pool: f64,
        #[arg(long)]
        no_pool: f64,
        #[arg(long, value_enum)]
        side: Side,
        #[arg(long)]
        stake: f64,
        #[arg(long, default_value_t = 250)]
        fee_bps: u16,
    },
    /// Quote against explicit race pools (SOL, comma separated)
    Race {
        #[arg(long, value_delimiter = ',')]
        pools: Vec<f64>,
        #[arg(long)]
        index: usize,
        #[arg(long)]
        stake: f64,
        #[arg(long, default_value_t = 250)]
        fee_bps: u16,
    },
    /// Quote against a live binary market
    Market {
        market_id: u64,
        #[arg(long, value_enum)]
        side: Side,
        #[arg(long)]
        stake: f64,
    },
    /// Projected claim for an owner's position
    Position { market_id: u64, owner: Pubkey },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Side {
    Yes,
    No,
}

impl Side {
    fn outcome(self) -> bool {
        matches!(self, Side::Yes)
    }
}

#[derive(Serialize)]
struct QuoteOutput {
    lamports: quote::Quote,
    sol: quote::QuoteSummary,
    implied_probabilities: Vec<f64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args.config)?;
    init_logging(&config, args.verbose)?;

    let ctx = config.program_context()?;
    info!(
        cluster = %ctx.cluster,
        program_id = %ctx.program_id,
        "Market adapter {}",
        env!("CARGO_PKG_VERSION")
    );

    let transport = Arc::new(RpcTransport::new(
        config.rpc_url(),
        config.commitment()?,
        config.timeout(),
    ));
    let reader = MarketReader::new(transport.clone(), &ctx);

    match args.command {
        Command::Derive { target } => {
            let derived = derive(&reader, &target)?;
            print_json(&serde_json::json!({
                "address": derived.address.to_string(),
                "bump": derived.bump,
            }))
        }
        Command::Decode { target } => decode(&reader, target).await,
        Command::Quote { target } => run_quote(&reader, &config, target).await,
        Command::BuildBet {
            market_id,
            side,
            amount,
            bettor,
            simulate,
        } => {
            let whitelist = match reader.market(market_id).await? {
                Some(market) => {
                    if !market.status.accepts_bets() {
                        warn!(market_id, status = %market.status, "Market is not accepting bets");
                    }
                    market.whitelist_account(reader.deriver())?
                }
                None => return Err(anyhow!("market {} not found", market_id)),
            };

            let assembler = TransactionAssembler::new(transport.clone(), InstructionEncoder::new(&ctx))
                .with_compute_budget(config.compute_budget())
                .with_message_version(config.transaction.message_version);
            let envelope = assembler
                .assemble(
                    &[MarketInstruction::PlaceBet(PlaceBet {
                        market_id,
                        outcome: side.outcome(),
                        amount: lamports(amount, "amount")?,
                        bettor,
                        whitelist,
                    })],
                    &bettor,
                )
                .await?;
            print_json(&envelope)?;

            if simulate {
                let outcome = simulate_envelope(transport.as_ref(), &envelope).await?;
                print_json(&outcome)?;
            }
            Ok(())
        }
        Command::Simulate { envelope } => {
            let outcome = transport.simulate(&envelope).await?;
            print_json(&outcome)
        }
        Command::Submit { envelope } => {
            let signature = submit_signed(transport.as_ref(), &envelope).await?;
            info!(signature = %signature, "Envelope relayed");
            print_json(&serde_json::json!({ "signature": signature }))
        }
        Command::Tags => {
            let opcodes: serde_json::Map<String, serde_json::Value> = Opcode::ALL
                .iter()
                .map(|op| (op.name().to_string(), hex::encode(op.tag()).into()))
                .collect();
            let kinds: serde_json::Map<String, serde_json::Value> = AccountKind::ALL
                .iter()
                .map(|k| (k.name().to_string(), hex::encode(k.tag()).into()))
                .collect();
            print_json(&serde_json::json!({ "instructions": opcodes, "accounts": kinds }))
        }
    }
}

fn derive<T: Transport>(reader: &MarketReader<T>, target: &Target) -> Result<DerivedAddress> {
    let d = reader.deriver();
    let derived = match target {
        Target::Config => d.config()?,
        Target::Market { market_id } => d.market(*market_id)?,
        Target::Position { market_id, owner } => d.position(*market_id, owner)?,
        Target::RaceMarket { market_id } => d.race_market(*market_id)?,
        Target::RacePosition { market_id, owner } => d.race_position(*market_id, owner)?,
        Target::Whitelist { market_id } => d.whitelist(*market_id)?,
        Target::RaceWhitelist { market_id } => d.race_whitelist(*market_id)?,
        Target::Affiliate { code } => d.affiliate(code)?,
        Target::CreatorProfile { owner } => d.creator_profile(owner)?,
        Target::Dispute { market_id } => d.dispute(&d.market(*market_id)?.address)?,
        Target::CouncilVote { market_id, voter } => {
            d.council_vote(&d.market(*market_id)?.address, voter)?
        }
    };
    Ok(derived)
}

async fn decode<T: Transport>(reader: &MarketReader<T>, target: DecodeTarget) -> Result<()> {
    match target {
        DecodeTarget::Account(target) => {
            let json = match target {
                Target::Config => to_json(reader.config().await?)?,
                Target::Market { market_id } => to_json(reader.market(market_id).await?)?,
                Target::Position { market_id, owner } => to_json(reader.position(market_id, &owner).await?)?,
                Target::RaceMarket { market_id } => to_json(reader.race_market(market_id).await?)?,
                Target::RacePosition { market_id, owner } => {
                    to_json(reader.race_position(market_id, &owner).await?)?
                }
                Target::Whitelist { market_id } => to_json(reader.whitelist(market_id).await?)?,
                Target::RaceWhitelist { market_id } => to_json(reader.race_whitelist(market_id).await?)?,
                Target::Affiliate { code } => to_json(reader.affiliate_by_code(&code).await?)?,
                Target::CreatorProfile { owner } => to_json(reader.creator_profile(&owner).await?)?,
                Target::Dispute { market_id } => to_json(reader.dispute(market_id).await?)?,
                Target::CouncilVote { .. } => {
                    return Err(anyhow!("council vote records have no decoder; use `derive` instead"))
                }
            };
            print_json(&json)
        }
        DecodeTarget::Address { address } => {
            let data = reader
                .fetch_raw(&address)
                .await?
                .ok_or_else(|| anyhow!("account {} not found", address))?;
            print_json(&decode_any(&data)?)
        }
        DecodeTarget::ListMarkets => {
            let batch = reader.list_markets().await?;
            report_failures(batch.failures.len());
            print_json(&batch_json(batch.records, batch.failures.len())?)
        }
        DecodeTarget::ListRaceMarkets => {
            let batch = reader.list_race_markets().await?;
            report_failures(batch.failures.len());
            print_json(&batch_json(batch.records, batch.failures.len())?)
        }
        DecodeTarget::Positions { owner } => {
            let batch = reader.positions_for_owner(&owner).await?;
            report_failures(batch.failures.len());
            print_json(&batch_json(batch.records, batch.failures.len())?)
        }
    }
}

/// Decode by kind tag, for addresses whose seed recipe is unknown
fn decode_any(data: &[u8]) -> Result<serde_json::Value> {
    let kind = AccountKind::identify(data).ok_or_else(|| anyhow!("unknown kind tag"))?;
    let record = match kind {
        AccountKind::Config => serde_json::to_value(ProgramConfig::decode(data)?)?,
        AccountKind::Market => serde_json::to_value(Market::decode(data)?)?,
        AccountKind::UserPosition => serde_json::to_value(UserPosition::decode(data)?)?,
        AccountKind::RaceMarket => serde_json::to_value(RaceMarket::decode(data)?)?,
        AccountKind::RacePosition => serde_json::to_value(RacePosition::decode(data)?)?,
        AccountKind::Affiliate => serde_json::to_value(Affiliate::decode(data)?)?,
        AccountKind::DisputeMeta => serde_json::to_value(DisputeRecord::decode(data)?)?,
        AccountKind::CreatorProfile => serde_json::to_value(CreatorProfile::decode(data)?)?,
        AccountKind::Whitelist => serde_json::to_value(Whitelist::decode(data)?)?,
    };
    Ok(serde_json::json!({ "kind": kind.name(), "record": record }))
}

async fn run_quote<T: Transport>(
    reader: &MarketReader<T>,
    config: &AdapterConfig,
    target: QuoteTarget,
) -> Result<()> {
    let decimals = config.quote.display_decimals;
    match target {
        QuoteTarget::Binary {
            yes_pool,
            no_pool,
            side,
            stake,
            fee_bps,
        } => {
            let pools = [lamports(yes_pool, "yes_pool")?, lamports(no_pool, "no_pool")?];
            let q = PariMutuelQuoter::new(fee_bps)?.quote_binary(
                pools[0],
                pools[1],
                side.outcome(),
                lamports(stake, "stake")?,
            )?;
            print_quote(q, &pools, decimals)
        }
        QuoteTarget::Race {
            pools,
            index,
            stake,
            fee_bps,
        } => {
            let pools = pools
                .iter()
                .map(|p| lamports(*p, "pools"))
                .collect::<Result<Vec<_>>>()?;
            let q = PariMutuelQuoter::new(fee_bps)?.quote_race(&pools, index, lamports(stake, "stake")?)?;
            print_quote(q, &pools, decimals)
        }
        QuoteTarget::Market {
            market_id,
            side,
            stake,
        } => {
            let market = reader
                .market(market_id)
                .await?
                .ok_or_else(|| anyhow!("market {} not found", market_id))?;
            let q = PariMutuelQuoter::for_market(&market)?.quote_binary(
                market.yes_pool,
                market.no_pool,
                side.outcome(),
                lamports(stake, "stake")?,
            )?;
            print_quote(q, &[market.yes_pool, market.no_pool], decimals)
        }
        QuoteTarget::Position { market_id, owner } => {
            let market = reader
                .market(market_id)
                .await?
                .ok_or_else(|| anyhow!("market {} not found", market_id))?;
            let position = reader
                .position(market_id, &owner)
                .await?
                .ok_or_else(|| anyhow!("no position for {} in market {}", owner, market_id))?;
            print_json(&quote::position_payout(&market, &position)?)
        }
    }
}

fn print_quote(q: quote::Quote, pools: &[u64], decimals: u32) -> Result<()> {
    print_json(&QuoteOutput {
        lamports: q,
        sol: q.summary(decimals),
        implied_probabilities: quote::implied_probabilities(pools),
    })
}

fn batch_json<R: Serialize>(records: Vec<(Pubkey, R)>, skipped: usize) -> Result<serde_json::Value> {
    let records = records
        .into_iter()
        .map(|(address, record)| {
            Ok(serde_json::json!({
                "address": address.to_string(),
                "record": serde_json::to_value(record)?,
            }))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(serde_json::json!({ "records": records, "skipped": skipped }))
}

fn report_failures(count: usize) {
    if count > 0 {
        warn!(skipped = count, "Some accounts could not be decoded");
    }
}

fn lamports(sol: f64, field: &str) -> Result<u64> {
    sol_to_lamports(sol).ok_or_else(|| anyhow!("{} must be a non-negative SOL amount, got {}", field, sol))
}

fn to_json<R: Serialize>(record: Option<R>) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(record)?)
}

fn print_json<S: Serialize>(value: &S) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn init_logging(config: &AdapterConfig, verbose: bool) -> Result<()> {
    let default_filter = if verbose {
        "market_adapter=debug,info".to_string()
    } else {
        config.logging.filter.clone()
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    Ok(())
}

/// Load configuration from file with fallback to defaults
fn load_config(path: &str) -> Result<AdapterConfig> {
    if std::path::Path::new(path).exists() {
        AdapterConfig::from_file_with_env(path)
            .with_context(|| format!("Failed to load config from {}", path))
    } else {
        AdapterConfig::from_env()
    }
}
