//! Test Utilities Module
//!
//! Deterministic record fixtures, their byte encodings, and an in-memory
//! [`Transport`] for exercising the reader and assembler without a node.
//!
//! These utilities are only compiled when running tests or when the
//! `test_utils` feature is enabled.

#![cfg(any(test, feature = "test_utils"))]

use crate::transport::{
    AccountFilter, LivenessToken, SimulationOutcome, Transport, TransportError, TransportResult,
};
use async_trait::async_trait;
use solana_sdk::{hash::Hash, pubkey::Pubkey};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Reference records and their encodings, field for field in layout order
pub mod fixtures {
    use crate::accounts::race_market::{LABEL_LEN, MAX_OUTCOMES};
    use crate::accounts::{
        AccessGate, AccountKind, Affiliate, CreatorProfile, Currency, DisputeRecord, FeeSnapshot,
        Layer, Market, MarketStatus, ProgramConfig, RaceMarket, RaceOutcome, RacePosition,
        ResolutionMode, UserPosition, Whitelist,
    };
    use crate::accounts::market::COUNCIL_SLOTS;
    use crate::codec::FieldWriter;
    use solana_sdk::pubkey::Pubkey;

    const SOL: u64 = 1_000_000_000;

    /// Stable, distinct key per seed byte
    pub fn key(seed: u8) -> Pubkey {
        Pubkey::new_from_array([seed; 32])
    }

    fn fee_snapshot(w: &mut FieldWriter, s: &FeeSnapshot) {
        w.u8(s.version)
            .u16(s.platform_fee_bps)
            .u16(s.creator_fee_bps)
            .u16(s.affiliate_fee_bps);
    }

    fn standard_fees() -> FeeSnapshot {
        FeeSnapshot {
            version: 1,
            platform_fee_bps: 200,
            creator_fee_bps: 50,
            affiliate_fee_bps: 25,
        }
    }

    pub fn sample_market() -> Market {
        Market {
            market_id: 42,
            question: "Will SOL close above $300 on Dec 31?".to_string(),
            closing_time: 1_767_139_200,
            resolution_time: 1_767_225_600,
            yes_pool: 120 * SOL,
            no_pool: 80 * SOL,
            snapshot_yes_pool: 0,
            snapshot_no_pool: 0,
            status: MarketStatus::Active,
            winning_outcome: Some(true),
            currency: Currency::Sol,
            platform_fee_collected: 3 * SOL,
            creator_fee_collected: SOL / 2,
            total_claimed: 0,
            layer: Layer::Community,
            access_gate: AccessGate::Public,
            resolution_mode: ResolutionMode::Council,
            creator: key(1),
            oracle: Some(key(2)),
            council: vec![key(10), key(11), key(12)],
            council_votes_yes: 1,
            council_votes_no: 0,
            council_threshold: 2,
            invite_hash: Some([7u8; 32]),
            dispute_deadline: 1_767_312_000,
            fee_snapshot: standard_fees(),
            bump: 254,
        }
    }

    pub fn encode_market(m: &Market) -> Vec<u8> {
        let mut w = FieldWriter::with_tag(&AccountKind::Market.tag());
        w.u64(m.market_id)
            .string(&m.question)
            .i64(m.closing_time)
            .i64(m.resolution_time)
            .u64(m.yes_pool)
            .u64(m.no_pool)
            .u64(m.snapshot_yes_pool)
            .u64(m.snapshot_no_pool)
            .u8(m.status.to_u8())
            .option(m.winning_outcome, |w, v| {
                w.bool(v);
            })
            .u8(m.currency.to_u8())
            .u64(m.platform_fee_collected)
            .u64(m.creator_fee_collected)
            .u64(m.total_claimed)
            .u8(m.layer.to_u8())
            .u8(m.access_gate.to_u8())
            .u8(m.resolution_mode.to_u8())
            .pubkey(&m.creator)
            .option(m.oracle, |w, k| {
                w.pubkey(&k);
            });
        for slot in 0..COUNCIL_SLOTS {
            w.pubkey(&m.council.get(slot).copied().unwrap_or_default());
        }
        w.u8(m.council.len() as u8)
            .u8(m.council_votes_yes)
            .u8(m.council_votes_no)
            .u8(m.council_threshold)
            .option(m.invite_hash, |w, h| {
                w.bytes(&h);
            })
            .i64(m.dispute_deadline);
        fee_snapshot(&mut w, &m.fee_snapshot);
        w.u8(m.bump);
        w.finish()
    }

    pub fn sample_race_market() -> RaceMarket {
        let outcomes = [("Alice", 5 * SOL), ("Bob", 3 * SOL), ("Carol", 2 * SOL)]
            .iter()
            .enumerate()
            .map(|(i, (label, pool))| RaceOutcome {
                index: i as u8,
                label: label.to_string(),
                pool: *pool,
            })
            .collect();
        RaceMarket {
            market_id: 43,
            question: "Who wins the 2026 league title?".to_string(),
            closing_time: 1_780_000_000,
            resolution_time: 1_780_086_400,
            creator: key(1),
            outcomes,
            total_pool: 10 * SOL,
            status: MarketStatus::Active,
            winning_outcome: Some(2),
            currency: Currency::Sol,
            platform_fee_collected: SOL / 5,
            creator_fee_collected: SOL / 20,
            total_claimed: 0,
            layer: Layer::Public,
            access_gate: AccessGate::Public,
            resolution_mode: ResolutionMode::HostOracle,
            oracle: Some(key(3)),
            fee_snapshot: standard_fees(),
            bump: 253,
        }
    }

    pub fn encode_race_market(r: &RaceMarket) -> Vec<u8> {
        let mut w = FieldWriter::with_tag(&AccountKind::RaceMarket.tag());
        w.u64(r.market_id)
            .string(&r.question)
            .i64(r.closing_time)
            .i64(r.resolution_time)
            .pubkey(&r.creator)
            .u8(r.outcomes.len() as u8);
        for slot in 0..MAX_OUTCOMES {
            match r.outcomes.get(slot) {
                Some(o) => {
                    w.padded_str::<LABEL_LEN>(&o.label)
                        .expect("fixture label fits")
                        .u64(o.pool);
                }
                None => {
                    w.bytes(&[0u8; LABEL_LEN]).u64(0);
                }
            }
        }
        w.u64(r.total_pool)
            .u8(r.status.to_u8())
            .option(r.winning_outcome, |w, v| {
                w.u8(v);
            })
            .u8(r.currency.to_u8())
            .u64(r.platform_fee_collected)
            .u64(r.creator_fee_collected)
            .u64(r.total_claimed)
            .u8(r.layer.to_u8())
            .u8(r.access_gate.to_u8())
            .u8(r.resolution_mode.to_u8())
            .option(r.oracle, |w, k| {
                w.pubkey(&k);
            });
        fee_snapshot(&mut w, &r.fee_snapshot);
        w.u8(r.bump);
        w.finish()
    }

    pub fn sample_user_position() -> UserPosition {
        UserPosition {
            owner: key(20),
            market_id: 42,
            yes_amount: 4 * SOL,
            no_amount: SOL,
            claimed: false,
            bump: 252,
            affiliate_fee_paid: 1_250_000,
            referred_by: Some(key(21)),
        }
    }

    pub fn encode_user_position(p: &UserPosition) -> Vec<u8> {
        let mut w = FieldWriter::with_tag(&AccountKind::UserPosition.tag());
        w.pubkey(&p.owner)
            .u64(p.market_id)
            .u64(p.yes_amount)
            .u64(p.no_amount)
            .bool(p.claimed)
            .u8(p.bump)
            .u64(p.affiliate_fee_paid)
            .option(p.referred_by, |w, k| {
                w.pubkey(&k);
            });
        w.finish()
    }

    pub fn sample_race_position() -> RacePosition {
        let mut bets = [0u64; MAX_OUTCOMES];
        bets[0] = 2 * SOL;
        bets[2] = SOL / 2;
        RacePosition {
            owner: key(20),
            market_id: 43,
            race_market: key(30),
            bets,
            total_bet: bets.iter().sum(),
            claimed: false,
            bump: 251,
            referred_by: None,
        }
    }

    pub fn encode_race_position(p: &RacePosition) -> Vec<u8> {
        let mut w = FieldWriter::with_tag(&AccountKind::RacePosition.tag());
        w.pubkey(&p.owner).u64(p.market_id).pubkey(&p.race_market);
        for bet in &p.bets {
            w.u64(*bet);
        }
        w.u64(p.total_bet)
            .bool(p.claimed)
            .u8(p.bump)
            .option(p.referred_by, |w, k| {
                w.pubkey(&k);
            });
        w.finish()
    }

    pub fn sample_affiliate() -> Affiliate {
        Affiliate {
            owner: key(21),
            code: "ALPHA".to_string(),
            total_earned: SOL,
            total_claimed: SOL / 4,
            total_referrals: 17,
            active: true,
            created_at: 1_750_000_000,
            bump: 250,
        }
    }

    pub fn encode_affiliate(a: &Affiliate) -> Vec<u8> {
        let mut w = FieldWriter::with_tag(&AccountKind::Affiliate.tag());
        w.pubkey(&a.owner)
            .string(&a.code)
            .u64(a.total_earned)
            .u64(a.total_claimed)
            .u32(a.total_referrals)
            .bool(a.active)
            .i64(a.created_at)
            .u8(a.bump);
        w.finish()
    }

    pub fn sample_dispute() -> DisputeRecord {
        DisputeRecord {
            market: key(40),
            disputer: key(22),
            reason: "Source article was retracted".to_string(),
            proposed_outcome: Some(false),
            bond: SOL / 10,
            created_at: 1_767_230_000,
            deadline: 1_767_316_400,
            resolved: false,
            bump: 249,
        }
    }

    pub fn encode_dispute(d: &DisputeRecord) -> Vec<u8> {
        let mut w = FieldWriter::with_tag(&AccountKind::DisputeMeta.tag());
        w.pubkey(&d.market)
            .pubkey(&d.disputer)
            .string(&d.reason)
            .option(d.proposed_outcome, |w, v| {
                w.bool(v);
            })
            .u64(d.bond)
            .i64(d.created_at)
            .i64(d.deadline)
            .bool(d.resolved)
            .u8(d.bump);
        w.finish()
    }

    pub fn sample_config() -> ProgramConfig {
        ProgramConfig {
            admin: key(50),
            treasury: key(51),
            guardian: key(52),
            public_fee_bps: 250,
            community_fee_bps: 300,
            private_fee_bps: 200,
            max_creator_fee_bps: 500,
            affiliate_fee_bps: 100,
            creation_fee: SOL / 100,
            market_count: 44,
            dispute_bond: SOL / 10,
            dispute_window_secs: 86_400,
            paused: false,
            bump: 255,
        }
    }

    pub fn encode_config(c: &ProgramConfig) -> Vec<u8> {
        let mut w = FieldWriter::with_tag(&AccountKind::Config.tag());
        w.pubkey(&c.admin)
            .pubkey(&c.treasury)
            .pubkey(&c.guardian)
            .u16(c.public_fee_bps)
            .u16(c.community_fee_bps)
            .u16(c.private_fee_bps)
            .u16(c.max_creator_fee_bps)
            .u16(c.affiliate_fee_bps)
            .u64(c.creation_fee)
            .u64(c.market_count)
            .u64(c.dispute_bond)
            .i64(c.dispute_window_secs)
            .bool(c.paused)
            .u8(c.bump);
        w.finish()
    }

    pub fn sample_creator_profile() -> CreatorProfile {
        CreatorProfile {
            owner: key(1),
            display_name: "oracle_anna".to_string(),
            default_fee_bps: 150,
            markets_created: 12,
            total_fees_earned: 7 * SOL,
            verified: true,
            created_at: 1_740_000_000,
            bump: 248,
        }
    }

    pub fn encode_creator_profile(p: &CreatorProfile) -> Vec<u8> {
        let mut w = FieldWriter::with_tag(&AccountKind::CreatorProfile.tag());
        w.pubkey(&p.owner)
            .string(&p.display_name)
            .u16(p.default_fee_bps)
            .u64(p.markets_created)
            .u64(p.total_fees_earned)
            .bool(p.verified)
            .i64(p.created_at)
            .u8(p.bump);
        w.finish()
    }

    pub fn sample_whitelist() -> Whitelist {
        Whitelist {
            market_id: 42,
            addresses: vec![key(20), key(23), key(24)],
            bump: 247,
        }
    }

    pub fn encode_whitelist(l: &Whitelist) -> Vec<u8> {
        let mut w = FieldWriter::with_tag(&AccountKind::Whitelist.tag());
        w.u64(l.market_id).pubkeys(&l.addresses).u8(l.bump);
        w.finish()
    }
}

#[derive(Default)]
struct MockState {
    accounts: BTreeMap<Pubkey, Vec<u8>>,
    liveness_calls: usize,
    liveness_failure: Option<TransportError>,
    simulation: SimulationOutcome,
    simulated: Vec<String>,
    submitted: Vec<String>,
}

/// In-memory transport
///
/// Accounts are held in a sorted map so program-account scans come back in
/// a stable order. Every call is recorded for assertions.
pub struct MockTransport {
    blockhash: Hash,
    state: Mutex<MockState>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            blockhash: Hash::new_from_array([9u8; 32]),
            state: Mutex::new(MockState {
                simulation: SimulationOutcome {
                    success: true,
                    compute_units: Some(5_000),
                    ..Default::default()
                },
                ..Default::default()
            }),
        }
    }

    /// Blockhash handed out by every liveness fetch
    pub fn blockhash(&self) -> Hash {
        self.blockhash
    }

    pub fn insert_account(&self, address: Pubkey, data: Vec<u8>) {
        self.state.lock().unwrap().accounts.insert(address, data);
    }

    pub fn liveness_calls(&self) -> usize {
        self.state.lock().unwrap().liveness_calls
    }

    /// Make every later liveness fetch fail with `error`
    pub fn fail_liveness(&self, error: TransportError) {
        self.state.lock().unwrap().liveness_failure = Some(error);
    }

    pub fn set_simulation(&self, outcome: SimulationOutcome) {
        self.state.lock().unwrap().simulation = outcome;
    }

    /// Envelopes passed to `simulate`, in call order
    pub fn simulated(&self) -> Vec<String> {
        self.state.lock().unwrap().simulated.clone()
    }

    pub fn submitted(&self) -> Vec<String> {
        self.state.lock().unwrap().submitted.clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn fetch_account(&self, address: &Pubkey) -> TransportResult<Option<Vec<u8>>> {
        Ok(self.state.lock().unwrap().accounts.get(address).cloned())
    }

    async fn fetch_program_accounts(
        &self,
        _program_id: &Pubkey,
        filters: &[AccountFilter],
    ) -> TransportResult<Vec<(Pubkey, Vec<u8>)>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .accounts
            .iter()
            .filter(|(_, data)| filters.iter().all(|f| f.matches(data)))
            .map(|(k, data)| (*k, data.clone()))
            .collect())
    }

    async fn fetch_liveness_token(&self) -> TransportResult<LivenessToken> {
        let mut state = self.state.lock().unwrap();
        state.liveness_calls += 1;
        if let Some(err) = state.liveness_failure.clone() {
            return Err(err);
        }
        Ok(LivenessToken {
            blockhash: self.blockhash,
            last_valid_block_height: 1_000,
        })
    }

    async fn submit(&self, envelope: &str) -> TransportResult<String> {
        let mut state = self.state.lock().unwrap();
        state.submitted.push(envelope.to_string());
        Ok(format!("mock-signature-{}", state.submitted.len()))
    }

    async fn simulate(&self, envelope: &str) -> TransportResult<SimulationOutcome> {
        let mut state = self.state.lock().unwrap();
        state.simulated.push(envelope.to_string());
        Ok(state.simulation.clone())
    }
}
