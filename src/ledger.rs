//! Stock ledger. Buys and sells produce a new portfolio snapshot plus the
//! transaction that was appended; the input snapshot is never touched.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::error::{Result, SimError};
use crate::risk;
use crate::transactions::new_tx_id;
use crate::types::{Holding, Portfolio, Side, Stock, StockTransaction};
use crate::utils::sanitize_symbol;

/// Buy `quantity` shares at the stock's current price.
///
/// Adds to an existing holding with a weighted-average cost basis, or opens a
/// new one at the execution price.
pub fn buy(
    portfolio: &Portfolio,
    stock: &Stock,
    quantity: i64,
    at: DateTime<Utc>,
) -> Result<(Portfolio, StockTransaction)> {
    let (qty, cost) = risk::pre_check_buy(portfolio, stock, quantity).inspect_err(|e| {
        warn!("BUY {} x{} rejected: {}", stock.symbol, quantity, e);
    })?;
    let sym = sanitize_symbol(&stock.symbol);

    let mut next = portfolio.clone();
    upsert_buy_with_cost(&mut next, &sym, qty, stock.price, cost).inspect_err(|e| {
        warn!("BUY {} x{} rejected: {}", stock.symbol, quantity, e);
    })?;
    next.cash -= cost;

    let tx = StockTransaction {
        id: new_tx_id(),
        symbol: sym,
        side: Side::Buy,
        quantity: qty,
        price: stock.price,
        timestamp: at,
    };
    next.transactions = next.transactions.appended(tx.clone());
    info!(
        "BUY {} x{} @ {} (cost {}, cash left {})",
        tx.symbol, qty, stock.price, cost, next.cash
    );
    Ok((next, tx))
}

/// Sell `quantity` shares at the stock's current price.
///
/// A holding that reaches zero is removed. No realized gain/loss is computed.
pub fn sell(
    portfolio: &Portfolio,
    stock: &Stock,
    quantity: i64,
    at: DateTime<Utc>,
) -> Result<(Portfolio, StockTransaction)> {
    let (qty, proceeds) = risk::pre_check_sell(portfolio, stock, quantity).inspect_err(|e| {
        warn!("SELL {} x{} rejected: {}", stock.symbol, quantity, e);
    })?;
    let sym = sanitize_symbol(&stock.symbol);

    let mut next = portfolio.clone();
    let remove = match next.holdings.get_mut(&sym) {
        Some(h) => {
            h.quantity -= qty;
            h.quantity == 0
        }
        None => false,
    };
    if remove {
        next.holdings.remove(&sym);
    }
    next.cash += proceeds;

    let tx = StockTransaction {
        id: new_tx_id(),
        symbol: sym,
        side: Side::Sell,
        quantity: qty,
        price: stock.price,
        timestamp: at,
    };
    next.transactions = next.transactions.appended(tx.clone());
    info!(
        "SELL {} x{} @ {} (proceeds {}, cash now {})",
        tx.symbol, qty, stock.price, proceeds, next.cash
    );
    Ok((next, tx))
}

/// Add settled cash, e.g. the proceeds of a property sale or a rent payment.
pub fn credit_cash(portfolio: &Portfolio, amount: Decimal) -> Result<Portfolio> {
    let amount = risk::check_amount(amount)?;
    let mut next = portfolio.clone();
    next.cash = next
        .cash
        .checked_add(amount)
        .ok_or(SimError::Overflow("credit"))?;
    Ok(next)
}

/// Take cash out, e.g. to pay for a property or a repair.
pub fn debit_cash(portfolio: &Portfolio, amount: Decimal) -> Result<Portfolio> {
    let amount = risk::check_amount(amount)?;
    risk::check_funds(portfolio, amount)?;
    let mut next = portfolio.clone();
    next.cash -= amount;
    Ok(next)
}

/// Weighted-average add for BUY fills.
fn upsert_buy_with_cost(
    portfolio: &mut Portfolio,
    symbol: &str,
    fill_qty: u64,
    fill_price: Decimal,
    cost: Decimal,
) -> Result<()> {
    match portfolio.holdings.get_mut(symbol) {
        Some(h) => {
            let total_cost = h
                .average_price
                .checked_mul(Decimal::from(h.quantity))
                .and_then(|held| held.checked_add(cost))
                .ok_or(SimError::Overflow("position cost"))?;
            h.quantity = h
                .quantity
                .checked_add(fill_qty)
                .ok_or(SimError::Overflow("position size"))?;
            h.average_price = total_cost / Decimal::from(h.quantity);
        }
        None => {
            portfolio.holdings.insert(
                symbol.to_string(),
                Holding {
                    symbol: symbol.to_string(),
                    quantity: fill_qty,
                    average_price: fill_price,
                },
            );
        }
    }
    Ok(())
}
