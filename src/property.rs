//! Real-estate lifecycle for a single property.
//!
//! An owned property is idle, listed for sale, listed for rent, or rented.
//! Every operation borrows the current snapshot and returns a new one (and the
//! transaction it produced, where there is one). Cash settlement is left to the
//! caller, which owns the portfolio.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::agents::{generate_buyers, generate_renters, AgentPool};
use crate::error::{Result, SimError};
use crate::random::RandomSource;
use crate::risk::check_amount;
use crate::transactions::new_tx_id;
use crate::types::{
    Condition, EstateTransaction, EstateTxKind, Listing, Offer, OwnedProperty, Property,
    RentRange,
};

fn invalid(operation: &'static str, owned: &OwnedProperty) -> SimError {
    let err = SimError::InvalidStateTransition {
        operation,
        state: owned.listing.name(),
    };
    warn!("{}: {}", owned.property.name, err);
    err
}

fn offer_not_found(offer_id: &str, owned: &OwnedProperty) -> SimError {
    let err = SimError::OfferNotFound(offer_id.to_string());
    warn!("{}: {}", owned.property.name, err);
    err
}

fn estate_tx(
    kind: EstateTxKind,
    property: &Property,
    amount: Decimal,
    at: DateTime<Utc>,
    notes: Option<String>,
) -> EstateTransaction {
    EstateTransaction {
        id: new_tx_id(),
        kind,
        property_name: property.name.clone(),
        amount,
        timestamp: at,
        notes,
        gain_loss: None,
    }
}

/// Highest offer in a pool, first one wins ties.
pub fn best_offer(offers: &[Offer]) -> Option<&Offer> {
    offers
        .iter()
        .reduce(|best, o| if o.offer > best.offer { o } else { best })
}

/// Take ownership of a market property at its current price. The caller pays.
pub fn purchase(property: &Property, at: DateTime<Utc>) -> Result<(OwnedProperty, EstateTransaction)> {
    if property.owned {
        let err = SimError::InvalidStateTransition {
            operation: "purchase",
            state: "owned",
        };
        warn!("{}: {}", property.name, err);
        return Err(err);
    }
    let mut bought = property.clone();
    bought.owned = true;
    bought.repairs = Decimal::ZERO;
    let tx = estate_tx(EstateTxKind::Buy, &bought, bought.price, at, None);
    info!("purchased {} for {}", bought.name, bought.price);
    let owned = OwnedProperty {
        purchase_price: bought.price,
        purchase_date: at,
        property: bought,
        listing: Listing::Idle,
        buyer_refreshes: 0,
        renter_refreshes: 0,
        rent_range: None,
    };
    Ok((owned, tx))
}

/// Put the property on the market with a fresh buyer pool. Drops a rent listing.
pub fn list_for_sale(
    owned: &OwnedProperty,
    pool: &AgentPool,
    rng: &mut dyn RandomSource,
) -> Result<OwnedProperty> {
    match owned.listing {
        Listing::Idle | Listing::ForRent { .. } => {}
        _ => return Err(invalid("list for sale", owned)),
    }
    let mut next = owned.clone();
    next.listing = Listing::ForSale {
        interested_buyers: generate_buyers(&owned.property, pool, rng),
    };
    next.buyer_refreshes = 0;
    info!(
        "{} listed for sale at {} ({} buyer(s))",
        next.property.name,
        next.property.price,
        next.interested_buyers().len()
    );
    Ok(next)
}

/// Replace the buyer pool. Offers do not accumulate across refreshes.
pub fn refresh_buyers(
    owned: &OwnedProperty,
    pool: &AgentPool,
    rng: &mut dyn RandomSource,
) -> Result<OwnedProperty> {
    if !owned.for_sale() {
        return Err(invalid("refresh buyers", owned));
    }
    let mut next = owned.clone();
    next.listing = Listing::ForSale {
        interested_buyers: generate_buyers(&owned.property, pool, rng),
    };
    next.buyer_refreshes += 1;
    Ok(next)
}

/// Sell to a buyer from the current pool. Returns the released property and
/// a SELL transaction carrying the gain or loss; the caller credits the cash.
pub fn accept_offer(
    owned: &OwnedProperty,
    buyer_id: &str,
    at: DateTime<Utc>,
) -> Result<(Property, EstateTransaction)> {
    if !owned.for_sale() {
        return Err(invalid("accept offer", owned));
    }
    let buyer = owned
        .interested_buyers()
        .iter()
        .find(|b| b.id == buyer_id)
        .ok_or_else(|| offer_not_found(buyer_id, owned))?;

    let gain_loss = buyer.offer - owned.purchase_price - owned.property.repairs;
    let mut released = owned.property.clone();
    released.owned = false;

    let mut tx = estate_tx(
        EstateTxKind::Sell,
        &released,
        buyer.offer,
        at,
        Some(format!("Sold to {}", buyer.name)),
    );
    tx.gain_loss = Some(gain_loss);
    info!(
        "{} sold to {} for {} (gain/loss {})",
        released.name, buyer.name, buyer.offer, gain_loss
    );
    Ok((released, tx))
}

/// Spend `amount` on repairs. Condition improves by exactly one step.
pub fn repair(
    owned: &OwnedProperty,
    amount: Decimal,
    at: DateTime<Utc>,
) -> Result<(OwnedProperty, EstateTransaction)> {
    let amount = check_amount(amount)?;
    let mut next = owned.clone();
    let before = next.property.condition;
    next.property.condition = before.upgrade();
    next.property.repairs += amount;
    let tx = estate_tx(
        EstateTxKind::Repair,
        &next.property,
        amount,
        at,
        Some(format!("{:?} -> {:?}", before, next.property.condition)),
    );
    info!(
        "repaired {} for {} ({:?} -> {:?})",
        next.property.name, amount, before, next.property.condition
    );
    Ok((next, tx))
}

/// Wear the property down one condition step. `NeedsRepair` stays put.
pub fn decay(owned: &OwnedProperty) -> OwnedProperty {
    let mut next = owned.clone();
    next.property.condition = random_condition_downgrade(owned.property.condition);
    next
}

/// Condition after one decay tick.
pub fn random_condition_downgrade(condition: Condition) -> Condition {
    condition.downgrade()
}

/// Scheduler hook: decay with probability `chance`. One draw per call.
pub fn maybe_decay(owned: &OwnedProperty, chance: f64, rng: &mut dyn RandomSource) -> OwnedProperty {
    let roll = rng.float_in_range(0.0, 1.0);
    if chance >= 1.0 || roll < chance {
        decay(owned)
    } else {
        owned.clone()
    }
}

/// Offer the property for rent within `range`. Drops a sale listing.
pub fn list_for_rent(
    owned: &OwnedProperty,
    range: RentRange,
    pool: &AgentPool,
    rng: &mut dyn RandomSource,
) -> Result<OwnedProperty> {
    match owned.listing {
        Listing::Idle | Listing::ForSale { .. } => {}
        _ => return Err(invalid("list for rent", owned)),
    }
    if range.low <= Decimal::ZERO || range.low > range.high {
        return Err(SimError::InvalidRentRange {
            low: range.low,
            high: range.high,
        });
    }
    let mut next = owned.clone();
    next.listing = Listing::ForRent {
        interested_renters: generate_renters(range.low, range.high, pool, rng),
    };
    next.rent_range = Some(range);
    next.renter_refreshes = 0;
    info!(
        "{} listed for rent at {}..{} ({} renter(s))",
        next.property.name,
        range.low,
        range.high,
        next.interested_renters().len()
    );
    Ok(next)
}

/// Replace the renter pool using the listed range.
pub fn refresh_renters(
    owned: &OwnedProperty,
    pool: &AgentPool,
    rng: &mut dyn RandomSource,
) -> Result<OwnedProperty> {
    let range = match (&owned.listing, owned.rent_range) {
        (Listing::ForRent { .. }, Some(range)) => range,
        _ => return Err(invalid("refresh renters", owned)),
    };
    let mut next = owned.clone();
    next.listing = Listing::ForRent {
        interested_renters: generate_renters(range.low, range.high, pool, rng),
    };
    next.renter_refreshes += 1;
    Ok(next)
}

/// Lease to a renter from the current pool at their offered rent.
pub fn accept_renter(
    owned: &OwnedProperty,
    renter_id: &str,
    at: DateTime<Utc>,
) -> Result<(OwnedProperty, EstateTransaction)> {
    if !owned.for_rent() {
        return Err(invalid("accept renter", owned));
    }
    let renter = owned
        .interested_renters()
        .iter()
        .find(|r| r.id == renter_id)
        .cloned()
        .ok_or_else(|| offer_not_found(renter_id, owned))?;

    let mut next = owned.clone();
    let tx = estate_tx(
        EstateTxKind::Rent,
        &next.property,
        renter.offer,
        at,
        Some(format!("Leased to {}", renter.name)),
    );
    info!(
        "{} rented to {} at {}",
        next.property.name, renter.name, renter.offer
    );
    next.listing = Listing::Rented {
        rent_amount: renter.offer,
        tenant: renter,
    };
    Ok((next, tx))
}

/// Record one rent payment. Ownership and tenancy are unchanged.
pub fn collect_rent(
    owned: &OwnedProperty,
    at: DateTime<Utc>,
) -> Result<(OwnedProperty, EstateTransaction)> {
    let (tenant, rent) = match &owned.listing {
        Listing::Rented {
            tenant,
            rent_amount,
        } => (tenant, *rent_amount),
        _ => return Err(invalid("collect rent", owned)),
    };
    let tx = estate_tx(
        EstateTxKind::RentPayment,
        &owned.property,
        rent,
        at,
        Some(format!("Paid by {}", tenant.name)),
    );
    info!("{} collected {} rent", owned.property.name, rent);
    Ok((owned.clone(), tx))
}

/// End the current tenancy.
pub fn vacate(owned: &OwnedProperty) -> Result<OwnedProperty> {
    if owned.rented_to().is_none() {
        return Err(invalid("vacate", owned));
    }
    let mut next = owned.clone();
    next.listing = Listing::Idle;
    info!("{} vacated", next.property.name);
    Ok(next)
}

/// Withdraw a sale or rent listing.
pub fn delist(owned: &OwnedProperty) -> Result<OwnedProperty> {
    if !owned.for_sale() && !owned.for_rent() {
        return Err(invalid("delist", owned));
    }
    let mut next = owned.clone();
    next.listing = Listing::Idle;
    Ok(next)
}

/// New market price; the old one moves into the trend.
pub fn reprice(owned: &OwnedProperty, new_price: Decimal) -> Result<OwnedProperty> {
    let new_price = check_amount(new_price)?;
    let mut next = owned.clone();
    let old = next.property.price;
    next.property.trend.push(old);
    next.property.price = new_price;
    Ok(next)
}
