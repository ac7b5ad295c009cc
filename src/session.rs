//! Single-writer session: owns one portfolio, the market snapshot and the
//! owned properties, and applies commands to them one at a time.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{error, info, warn};

use crate::agents::AgentPool;
use crate::config::AppConfig;
use crate::ledger;
use crate::parser::{is_skippable, parse_command, Command};
use crate::property::{self, best_offer};
use crate::random::{RandomSource, SeededRandom};
use crate::transactions::TransactionLog;
use crate::types::{EstateTransaction, OwnedProperty, Portfolio, Property, RentRange, Stock};
use crate::utils::sanitize_symbol;

pub struct Session {
    portfolio: Portfolio,
    stocks: BTreeMap<String, Stock>,
    /// Properties available to buy, keyed by id.
    market: BTreeMap<String, Property>,
    owned: BTreeMap<String, OwnedProperty>,
    estate_log: TransactionLog<EstateTransaction>,
    agents: AgentPool,
    decay_chance: f64,
    rng: Box<dyn RandomSource>,
}

#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub portfolio: &'a Portfolio,
    pub owned_properties: Vec<&'a OwnedProperty>,
    pub market_properties: Vec<&'a Property>,
    pub estate_transactions: &'a TransactionLog<EstateTransaction>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScriptSummary {
    pub applied: usize,
    pub rejected: usize,
    pub unparsed: usize,
}

fn owned_in<'a>(
    owned: &'a BTreeMap<String, OwnedProperty>,
    id: &str,
) -> Result<&'a OwnedProperty> {
    owned
        .get(id)
        .ok_or_else(|| anyhow!("property {id} is not owned"))
}

impl Session {
    pub fn new(cfg: &AppConfig, rng: Box<dyn RandomSource>) -> Self {
        Self {
            portfolio: Portfolio::new(cfg.session.starting_cash),
            stocks: cfg
                .market
                .stocks
                .iter()
                .map(|s| (sanitize_symbol(&s.symbol), s.clone()))
                .collect(),
            market: cfg
                .market
                .properties
                .iter()
                .map(|p| (p.id.clone(), p.clone()))
                .collect(),
            owned: BTreeMap::new(),
            estate_log: TransactionLog::new(),
            agents: cfg.agents.clone(),
            decay_chance: cfg.session.decay_chance,
            rng,
        }
    }

    /// Session seeded from config, or from entropy when no seed is set.
    pub fn from_config(cfg: &AppConfig) -> Self {
        let rng = match cfg.session.seed {
            Some(seed) => SeededRandom::new(seed),
            None => SeededRandom::from_entropy(),
        };
        Self::new(cfg, Box::new(rng))
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    pub fn owned(&self, id: &str) -> Option<&OwnedProperty> {
        self.owned.get(id)
    }

    pub fn estate_log(&self) -> &TransactionLog<EstateTransaction> {
        &self.estate_log
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            portfolio: &self.portfolio,
            owned_properties: self.owned.values().collect(),
            market_properties: self.market.values().collect(),
            estate_transactions: &self.estate_log,
        }
    }

    fn stock(&self, symbol: &str) -> Result<&Stock> {
        self.stocks
            .get(&sanitize_symbol(symbol))
            .ok_or_else(|| anyhow!("unknown stock {symbol}"))
    }

    /// Apply one command. On error nothing in the session changes.
    pub fn apply(&mut self, cmd: Command, at: DateTime<Utc>) -> Result<()> {
        match cmd {
            Command::Buy { symbol, quantity } => {
                let stock = self.stock(&symbol)?;
                let (next, _) = ledger::buy(&self.portfolio, stock, quantity, at)?;
                self.portfolio = next;
            }
            Command::Sell { symbol, quantity } => {
                let stock = self.stock(&symbol)?;
                let (next, _) = ledger::sell(&self.portfolio, stock, quantity, at)?;
                self.portfolio = next;
            }
            Command::Purchase(id) => {
                let listing = self
                    .market
                    .get(&id)
                    .ok_or_else(|| anyhow!("property {id} is not on the market"))?;
                let (owned, tx) = property::purchase(listing, at)?;
                let paid = ledger::debit_cash(&self.portfolio, tx.amount)?;
                self.portfolio = paid;
                self.market.remove(&id);
                self.owned.insert(id, owned);
                self.estate_log.push(tx);
            }
            Command::ListForSale(id) => {
                let next = property::list_for_sale(
                    owned_in(&self.owned, &id)?,
                    &self.agents,
                    self.rng.as_mut(),
                )?;
                self.owned.insert(id, next);
            }
            Command::RefreshBuyers(id) => {
                let next = property::refresh_buyers(
                    owned_in(&self.owned, &id)?,
                    &self.agents,
                    self.rng.as_mut(),
                )?;
                self.owned.insert(id, next);
            }
            Command::AcceptBestOffer(id) => {
                let owned = owned_in(&self.owned, &id)?;
                let buyer_id = best_offer(owned.interested_buyers())
                    .map(|b| b.id.clone())
                    .ok_or_else(|| anyhow!("no buyers for {id}"))?;
                let (released, tx) = property::accept_offer(owned, &buyer_id, at)?;
                self.portfolio = ledger::credit_cash(&self.portfolio, tx.amount)?;
                self.owned.remove(&id);
                self.market.insert(id, released);
                self.estate_log.push(tx);
            }
            Command::Repair { property: id, amount } => {
                let (next, tx) = property::repair(owned_in(&self.owned, &id)?, amount, at)?;
                self.portfolio = ledger::debit_cash(&self.portfolio, amount)?;
                self.owned.insert(id, next);
                self.estate_log.push(tx);
            }
            Command::Decay(id) => {
                let next = property::maybe_decay(
                    owned_in(&self.owned, &id)?,
                    self.decay_chance,
                    self.rng.as_mut(),
                );
                info!("{} condition now {:?}", id, next.property.condition);
                self.owned.insert(id, next);
            }
            Command::ListForRent { property: id, low, high } => {
                let next = property::list_for_rent(
                    owned_in(&self.owned, &id)?,
                    RentRange { low, high },
                    &self.agents,
                    self.rng.as_mut(),
                )?;
                self.owned.insert(id, next);
            }
            Command::RefreshRenters(id) => {
                let next = property::refresh_renters(
                    owned_in(&self.owned, &id)?,
                    &self.agents,
                    self.rng.as_mut(),
                )?;
                self.owned.insert(id, next);
            }
            Command::AcceptBestRenter(id) => {
                let owned = owned_in(&self.owned, &id)?;
                let renter_id = best_offer(owned.interested_renters())
                    .map(|r| r.id.clone())
                    .ok_or_else(|| anyhow!("no renters for {id}"))?;
                let (next, tx) = property::accept_renter(owned, &renter_id, at)?;
                self.owned.insert(id, next);
                self.estate_log.push(tx);
            }
            Command::CollectRent(id) => {
                let (next, tx) = property::collect_rent(owned_in(&self.owned, &id)?, at)?;
                self.portfolio = ledger::credit_cash(&self.portfolio, tx.amount)?;
                self.owned.insert(id, next);
                self.estate_log.push(tx);
            }
            Command::Vacate(id) => {
                let next = property::vacate(owned_in(&self.owned, &id)?)?;
                self.owned.insert(id, next);
            }
            Command::Delist(id) => {
                let next = property::delist(owned_in(&self.owned, &id)?)?;
                self.owned.insert(id, next);
            }
            Command::Reprice { property: id, price } => {
                let next = property::reprice(owned_in(&self.owned, &id)?, price)?;
                self.owned.insert(id, next);
            }
        }
        Ok(())
    }

    /// Replay a script. Bad lines are logged and skipped.
    pub fn run_script(&mut self, script: &str) -> ScriptSummary {
        let mut summary = ScriptSummary::default();
        for (n, line) in script.lines().enumerate() {
            if is_skippable(line) {
                continue;
            }
            let Some(cmd) = parse_command(line) else {
                warn!("line {}: unrecognized command: {}", n + 1, line.trim());
                summary.unparsed += 1;
                continue;
            };
            match self.apply(cmd, Utc::now()) {
                Ok(()) => summary.applied += 1,
                Err(e) => {
                    error!("line {}: {} rejected: {:#}", n + 1, line.trim(), e);
                    summary.rejected += 1;
                }
            }
        }
        info!(
            "script done: {} applied, {} rejected, {} unparsed",
            summary.applied, summary.rejected, summary.unparsed
        );
        summary
    }
}
