//! Fetch-and-decode helpers over a [`Transport`]
//!
//! Every call fetches fresh bytes; nothing is cached. Single lookups return
//! `Ok(None)` when the account does not exist. Batch listings never abort on
//! a bad account: undecodable items are skipped, logged and returned in
//! [`BatchResult::failures`].

pub mod errors;

pub use errors::ReadError;

use crate::accounts::{
    AccountKind, AccountRecord, Affiliate, CreatorProfile, DisputeRecord, Market, ProgramConfig,
    RaceMarket, RacePosition, UserPosition, Whitelist,
};
use crate::codec::{CodecError, TAG_LEN};
use crate::pda::AddressDeriver;
use crate::transport::{AccountFilter, Transport};
use crate::types::ProgramContext;
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use tracing::{debug, warn};

/// An account skipped during a batch listing
#[derive(Debug, Clone)]
pub struct BatchFailure {
    pub address: Pubkey,
    pub error: CodecError,
}

/// Decoded records plus the accounts that could not be decoded
#[derive(Debug, Clone)]
pub struct BatchResult<R> {
    pub records: Vec<(Pubkey, R)>,
    pub failures: Vec<BatchFailure>,
}

impl<R> Default for BatchResult<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<R> BatchResult<R> {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct MarketReader<T: Transport> {
    transport: Arc<T>,
    deriver: AddressDeriver,
}

impl<T: Transport> MarketReader<T> {
    pub fn new(transport: Arc<T>, ctx: &ProgramContext) -> Self {
        Self {
            transport,
            deriver: AddressDeriver::new(ctx),
        }
    }

    pub fn deriver(&self) -> &AddressDeriver {
        &self.deriver
    }

    /// Raw account bytes, for callers that identify the kind themselves
    pub async fn fetch_raw(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, ReadError> {
        Ok(self.transport.fetch_account(address).await?)
    }

    /// Fetch and decode one record at a known address
    pub async fn fetch<R: AccountRecord>(&self, address: &Pubkey) -> Result<Option<R>, ReadError> {
        let Some(data) = self.fetch_raw(address).await? else {
            debug!(kind = R::KIND.name(), address = %address, "Account not found");
            return Ok(None);
        };
        match R::decode(&data) {
            Ok(record) => Ok(Some(record)),
            Err(source) => {
                record_decode_failure(R::KIND, address, &source);
                Err(ReadError::Decode {
                    kind: R::KIND.name(),
                    address: *address,
                    source,
                })
            }
        }
    }

    pub async fn config(&self) -> Result<Option<ProgramConfig>, ReadError> {
        self.fetch(&self.deriver.config()?.address).await
    }

    pub async fn market(&self, market_id: u64) -> Result<Option<Market>, ReadError> {
        self.fetch(&self.deriver.market(market_id)?.address).await
    }

    pub async fn position(&self, market_id: u64, owner: &Pubkey) -> Result<Option<UserPosition>, ReadError> {
        self.fetch(&self.deriver.position(market_id, owner)?.address).await
    }

    pub async fn race_market(&self, market_id: u64) -> Result<Option<RaceMarket>, ReadError> {
        self.fetch(&self.deriver.race_market(market_id)?.address).await
    }

    pub async fn race_position(
        &self,
        market_id: u64,
        owner: &Pubkey,
    ) -> Result<Option<RacePosition>, ReadError> {
        self.fetch(&self.deriver.race_position(market_id, owner)?.address)
            .await
    }

    pub async fn affiliate_by_code(&self, code: &str) -> Result<Option<Affiliate>, ReadError> {
        self.fetch(&self.deriver.affiliate(code)?.address).await
    }

    /// Dispute raised against a binary market
    pub async fn dispute(&self, market_id: u64) -> Result<Option<DisputeRecord>, ReadError> {
        let market = self.deriver.market(market_id)?.address;
        self.fetch(&self.deriver.dispute(&market)?.address).await
    }

    pub async fn creator_profile(&self, owner: &Pubkey) -> Result<Option<CreatorProfile>, ReadError> {
        self.fetch(&self.deriver.creator_profile(owner)?.address).await
    }

    pub async fn whitelist(&self, market_id: u64) -> Result<Option<Whitelist>, ReadError> {
        self.fetch(&self.deriver.whitelist(market_id)?.address).await
    }

    pub async fn race_whitelist(&self, market_id: u64) -> Result<Option<Whitelist>, ReadError> {
        self.fetch(&self.deriver.race_whitelist(market_id)?.address)
            .await
    }

    /// Every binary market owned by the program
    pub async fn list_markets(&self) -> Result<BatchResult<Market>, ReadError> {
        self.list(vec![AccountFilter::kind_tag(Market::KIND.tag())], |_| true)
            .await
    }

    /// Every race market; undersized accounts are dropped before decoding
    pub async fn list_race_markets(&self) -> Result<BatchResult<RaceMarket>, ReadError> {
        self.list(
            vec![AccountFilter::kind_tag(RaceMarket::KIND.tag())],
            RaceMarket::plausible_len,
        )
        .await
    }

    /// Binary positions held by `owner`, matched on the owner field
    pub async fn positions_for_owner(&self, owner: &Pubkey) -> Result<BatchResult<UserPosition>, ReadError> {
        self.list(owner_filters(UserPosition::KIND, owner), |_| true)
            .await
    }

    pub async fn race_positions_for_owner(
        &self,
        owner: &Pubkey,
    ) -> Result<BatchResult<RacePosition>, ReadError> {
        self.list(owner_filters(RacePosition::KIND, owner), |_| true)
            .await
    }

    async fn list<R: AccountRecord>(
        &self,
        filters: Vec<AccountFilter>,
        plausible_len: impl Fn(usize) -> bool,
    ) -> Result<BatchResult<R>, ReadError> {
        let accounts = self
            .transport
            .fetch_program_accounts(self.deriver.program_id(), &filters)
            .await?;

        let mut result = BatchResult::default();
        for (address, data) in accounts {
            if !plausible_len(data.len()) {
                debug!(
                    kind = R::KIND.name(),
                    address = %address,
                    len = data.len(),
                    "Skipping undersized account"
                );
                continue;
            }
            match R::decode(&data) {
                Ok(record) => result.records.push((address, record)),
                Err(error) => {
                    record_decode_failure(R::KIND, &address, &error);
                    warn!(
                        kind = R::KIND.name(),
                        address = %address,
                        error = %error,
                        "Skipping undecodable account"
                    );
                    result.failures.push(BatchFailure { address, error });
                }
            }
        }

        debug!(
            kind = R::KIND.name(),
            decoded = result.records.len(),
            skipped = result.failures.len(),
            "Listing complete"
        );
        Ok(result)
    }
}

/// Kind tag plus the owner field, which directly follows the tag
fn owner_filters(kind: AccountKind, owner: &Pubkey) -> Vec<AccountFilter> {
    vec![
        AccountFilter::kind_tag(kind.tag()),
        AccountFilter::new(TAG_LEN, owner.to_bytes().to_vec()),
    ]
}

fn record_decode_failure(kind: AccountKind, address: &Pubkey, error: &CodecError) {
    metrics::counter!("market_adapter_decode_failures", "kind" => kind.name()).increment(1);
    debug!(kind = kind.name(), address = %address, error = %error, "Decode failed");
}
