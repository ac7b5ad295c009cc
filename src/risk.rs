//! Pre-trade checks. Every check runs before any accounting touches the portfolio.

use rust_decimal::Decimal;

use crate::error::{Result, SimError};
use crate::types::{Portfolio, Stock};

/// Validated order size.
pub fn check_quantity(quantity: i64) -> Result<u64> {
    if quantity <= 0 {
        return Err(SimError::InvalidQuantity(quantity));
    }
    Ok(quantity as u64)
}

pub fn check_amount(amount: Decimal) -> Result<Decimal> {
    if amount <= Decimal::ZERO {
        return Err(SimError::InvalidAmount(amount));
    }
    Ok(amount)
}

pub fn check_funds(portfolio: &Portfolio, needed: Decimal) -> Result<()> {
    if needed > portfolio.cash {
        return Err(SimError::InsufficientFunds {
            needed,
            available: portfolio.cash,
        });
    }
    Ok(())
}

/// Execution prices may be zero but never negative.
pub fn check_price(stock: &Stock) -> Result<Decimal> {
    if stock.price < Decimal::ZERO {
        return Err(SimError::InvalidAmount(stock.price));
    }
    Ok(stock.price)
}

/// Returns `(quantity, cost)` for a buy that the portfolio can afford.
/// A cost too large to represent is more than any balance can cover.
pub fn pre_check_buy(portfolio: &Portfolio, stock: &Stock, quantity: i64) -> Result<(u64, Decimal)> {
    let qty = check_quantity(quantity)?;
    let price = check_price(stock)?;
    let cost = price
        .checked_mul(Decimal::from(qty))
        .ok_or(SimError::InsufficientFunds {
            needed: Decimal::MAX,
            available: portfolio.cash,
        })?;
    check_funds(portfolio, cost)?;
    Ok((qty, cost))
}

/// Returns `(quantity, proceeds)` for a sell that the portfolio can cover.
pub fn pre_check_sell(portfolio: &Portfolio, stock: &Stock, quantity: i64) -> Result<(u64, Decimal)> {
    let qty = check_quantity(quantity)?;
    let price = check_price(stock)?;
    let held = portfolio.position_qty(&stock.symbol);
    if held < qty {
        return Err(SimError::InsufficientHoldings {
            symbol: crate::utils::sanitize_symbol(&stock.symbol),
            requested: qty,
            held,
        });
    }
    let proceeds = price
        .checked_mul(Decimal::from(qty))
        .filter(|p| portfolio.cash.checked_add(*p).is_some())
        .ok_or(SimError::Overflow("sale proceeds"))?;
    Ok((qty, proceeds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn stock(price: Decimal) -> Stock {
        Stock {
            symbol: "X".into(),
            name: "X Corp".into(),
            price,
        }
    }

    #[test]
    fn zero_and_negative_quantities_rejected() {
        assert_eq!(check_quantity(0), Err(SimError::InvalidQuantity(0)));
        assert_eq!(check_quantity(-3), Err(SimError::InvalidQuantity(-3)));
        assert_eq!(check_quantity(7), Ok(7));
    }

    #[test]
    fn quantity_checked_before_funds() {
        let p = Portfolio::new(Decimal::ZERO);
        assert_eq!(
            pre_check_buy(&p, &stock(dec!(10)), 0),
            Err(SimError::InvalidQuantity(0))
        );
    }

    #[test]
    fn exact_cash_is_enough() {
        let p = Portfolio::new(dec!(1000));
        assert_eq!(pre_check_buy(&p, &stock(dec!(10)), 100), Ok((100, dec!(1000))));
        assert!(matches!(
            pre_check_buy(&p, &stock(dec!(10)), 101),
            Err(SimError::InsufficientFunds { .. })
        ));
    }

    #[test]
    fn sell_without_holding_reports_zero_held() {
        let p = Portfolio::new(dec!(1000));
        assert_eq!(
            pre_check_sell(&p, &stock(dec!(10)), 1),
            Err(SimError::InsufficientHoldings {
                symbol: "X".into(),
                requested: 1,
                held: 0,
            })
        );
    }

    #[test]
    fn negative_price_rejected_on_both_sides() {
        let p = Portfolio::new(dec!(1000));
        assert_eq!(
            pre_check_buy(&p, &stock(dec!(-5)), 1),
            Err(SimError::InvalidAmount(dec!(-5)))
        );
        assert_eq!(
            pre_check_sell(&p, &stock(dec!(-5)), 1),
            Err(SimError::InvalidAmount(dec!(-5)))
        );
        assert_eq!(pre_check_buy(&p, &stock(Decimal::ZERO), 3), Ok((3, Decimal::ZERO)));
    }

    #[test]
    fn unrepresentable_cost_is_insufficient_funds() {
        let p = Portfolio::new(dec!(1000));
        assert_eq!(
            pre_check_buy(&p, &stock(Decimal::MAX), 2),
            Err(SimError::InsufficientFunds {
                needed: Decimal::MAX,
                available: dec!(1000),
            })
        );
    }

    #[test]
    fn amounts_must_be_positive() {
        assert!(check_amount(dec!(0.01)).is_ok());
        assert_eq!(check_amount(Decimal::ZERO), Err(SimError::InvalidAmount(Decimal::ZERO)));
    }
}
