//! Core domain types for stocks, holdings, properties, offers and transactions.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::transactions::TransactionLog;

/// Market snapshot of a single stock. Supplied by a price feed, never mutated here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stock {
    pub symbol: String,
    pub name: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Holding {
    pub symbol: String,
    pub quantity: u64,
    /// Weighted mean of the buy fills still held.
    pub average_price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockTransaction {
    pub id: String,
    pub symbol: String,
    pub side: Side,
    pub quantity: u64,
    /// Execution price of this fill, not the holding average.
    pub price: Decimal,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Portfolio {
    pub cash: Decimal,
    pub holdings: BTreeMap<String, Holding>,
    pub transactions: TransactionLog<StockTransaction>,
}

impl Portfolio {
    pub fn new(cash: Decimal) -> Self {
        Self {
            cash,
            ..Self::default()
        }
    }

    pub fn holding(&self, symbol: &str) -> Option<&Holding> {
        self.holdings.get(&crate::utils::sanitize_symbol(symbol))
    }

    pub fn position_qty(&self, symbol: &str) -> u64 {
        self.holding(symbol).map_or(0, |h| h.quantity)
    }

    /// Sum of quantity × average price over all holdings.
    pub fn cost_basis(&self) -> Decimal {
        self.holdings
            .values()
            .map(|h| h.average_price * Decimal::from(h.quantity))
            .sum()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Condition {
    NeedsRepair,
    Fair,
    Good,
    Excellent,
}

impl Condition {
    /// One step down; `NeedsRepair` is absorbing.
    pub fn downgrade(self) -> Self {
        match self {
            Condition::Excellent => Condition::Good,
            Condition::Good => Condition::Fair,
            Condition::Fair | Condition::NeedsRepair => Condition::NeedsRepair,
        }
    }

    /// One step up; `Excellent` stays put.
    pub fn upgrade(self) -> Self {
        match self {
            Condition::NeedsRepair => Condition::Fair,
            Condition::Fair => Condition::Good,
            Condition::Good | Condition::Excellent => Condition::Excellent,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Property {
    pub id: String,
    pub name: String,
    pub location: String,
    pub price: Decimal,
    /// Historical prices, oldest first.
    #[serde(default)]
    pub trend: Vec<Decimal>,
    pub condition: Condition,
    #[serde(default)]
    pub owned: bool,
    #[serde(default)]
    pub repairs: Decimal,
}

/// A synthetic buyer or renter and what they are willing to pay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Offer {
    pub id: String,
    pub name: String,
    pub offer: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

pub type Buyer = Offer;
pub type Renter = Offer;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RentRange {
    pub low: Decimal,
    pub high: Decimal,
}

/// What an owned property is currently doing. Sale and rent listings cannot
/// coexist with a tenant.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Listing {
    #[default]
    Idle,
    ForSale {
        interested_buyers: Vec<Buyer>,
    },
    ForRent {
        interested_renters: Vec<Renter>,
    },
    Rented {
        tenant: Renter,
        rent_amount: Decimal,
    },
}

impl Listing {
    pub fn name(&self) -> &'static str {
        match self {
            Listing::Idle => "idle",
            Listing::ForSale { .. } => "for_sale",
            Listing::ForRent { .. } => "for_rent",
            Listing::Rented { .. } => "rented",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OwnedProperty {
    pub property: Property,
    pub purchase_price: Decimal,
    pub purchase_date: DateTime<Utc>,
    pub listing: Listing,
    pub buyer_refreshes: u32,
    pub renter_refreshes: u32,
    /// Last range renters were generated from.
    pub rent_range: Option<RentRange>,
}

impl OwnedProperty {
    pub fn for_sale(&self) -> bool {
        matches!(self.listing, Listing::ForSale { .. })
    }

    pub fn for_rent(&self) -> bool {
        matches!(self.listing, Listing::ForRent { .. })
    }

    pub fn rented_to(&self) -> Option<&Renter> {
        match &self.listing {
            Listing::Rented { tenant, .. } => Some(tenant),
            _ => None,
        }
    }

    pub fn rent_amount(&self) -> Decimal {
        match &self.listing {
            Listing::Rented { rent_amount, .. } => *rent_amount,
            _ => Decimal::ZERO,
        }
    }

    pub fn interested_buyers(&self) -> &[Buyer] {
        match &self.listing {
            Listing::ForSale { interested_buyers } => interested_buyers,
            _ => &[],
        }
    }

    pub fn interested_renters(&self) -> &[Renter] {
        match &self.listing {
            Listing::ForRent { interested_renters } => interested_renters,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EstateTxKind {
    Buy,
    Sell,
    Repair,
    Rent,
    RentPayment,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EstateTransaction {
    pub id: String,
    pub kind: EstateTxKind,
    pub property_name: String,
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Only set on sales: offer minus purchase price minus repairs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gain_loss: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downgrade_walks_to_needs_repair_and_stays() {
        let mut c = Condition::Excellent;
        let mut seen = vec![c];
        for _ in 0..4 {
            c = c.downgrade();
            seen.push(c);
        }
        assert_eq!(
            seen,
            vec![
                Condition::Excellent,
                Condition::Good,
                Condition::Fair,
                Condition::NeedsRepair,
                Condition::NeedsRepair,
            ]
        );
    }

    #[test]
    fn upgrade_is_one_step_and_caps() {
        assert_eq!(Condition::NeedsRepair.upgrade(), Condition::Fair);
        assert_eq!(Condition::Fair.upgrade(), Condition::Good);
        assert_eq!(Condition::Good.upgrade(), Condition::Excellent);
        assert_eq!(Condition::Excellent.upgrade(), Condition::Excellent);
    }

    #[test]
    fn estate_kind_serializes_like_the_tag() {
        let s = serde_json::to_string(&EstateTxKind::RentPayment).unwrap();
        assert_eq!(s, "\"RENT_PAYMENT\"");
        let s = serde_json::to_string(&Side::Buy).unwrap();
        assert_eq!(s, "\"BUY\"");
    }
}
