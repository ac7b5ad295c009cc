//! Parse session commands, one per line.
//! Stocks: `BUY 50 ACME`, `SELL 10 ACME`. Properties: `<VERB> <property-id> [args]`.

use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Buy { symbol: String, quantity: i64 },
    Sell { symbol: String, quantity: i64 },
    Purchase(String),
    ListForSale(String),
    RefreshBuyers(String),
    AcceptBestOffer(String),
    Repair { property: String, amount: Decimal },
    Decay(String),
    ListForRent { property: String, low: Decimal, high: Decimal },
    RefreshRenters(String),
    AcceptBestRenter(String),
    CollectRent(String),
    Vacate(String),
    Delist(String),
    Reprice { property: String, price: Decimal },
}

pub fn parse_command(text: &str) -> Option<Command> {
    let t = text.trim();

    // Quantity may be signed so the ledger can reject it with a typed error.
    let re_stk = Regex::new(r"(?i)^(BUY|SELL)\s+(-?\d+)\s+([A-Z.]{1,8})$").unwrap();
    if let Some(c) = re_stk.captures(t) {
        let quantity: i64 = c[2].parse().ok()?;
        let symbol = c[3].to_uppercase();
        return Some(match &c[1].to_uppercase()[..] {
            "BUY" => Command::Buy { symbol, quantity },
            _ => Command::Sell { symbol, quantity },
        });
    }

    let re_prop = Regex::new(r"(?i)^([A-Z]+)\s+([\w-]+)((?:\s+-?[\d.]+)*)$").unwrap();
    let c = re_prop.captures(t)?;
    let verb = c[1].to_uppercase();
    let id = c[2].to_string();
    let args: Vec<Decimal> = c[3]
        .split_whitespace()
        .map(Decimal::from_str)
        .collect::<Result<_, _>>()
        .ok()?;

    let cmd = match (verb.as_str(), args.as_slice()) {
        ("PURCHASE", []) => Command::Purchase(id),
        ("LIST", []) => Command::ListForSale(id),
        ("REFRESH", []) => Command::RefreshBuyers(id),
        ("ACCEPT", []) => Command::AcceptBestOffer(id),
        ("REPAIR", [amount]) => Command::Repair {
            property: id,
            amount: *amount,
        },
        ("DECAY", []) => Command::Decay(id),
        ("RENT", [low, high]) => Command::ListForRent {
            property: id,
            low: *low,
            high: *high,
        },
        ("TENANTS", []) => Command::RefreshRenters(id),
        ("TENANT", []) => Command::AcceptBestRenter(id),
        ("COLLECT", []) => Command::CollectRent(id),
        ("VACATE", []) => Command::Vacate(id),
        ("DELIST", []) => Command::Delist(id),
        ("PRICE", [price]) => Command::Reprice {
            property: id,
            price: *price,
        },
        _ => return None,
    };
    Some(cmd)
}

/// Blank lines and `#` comments carry no command.
pub fn is_skippable(line: &str) -> bool {
    let t = line.trim();
    t.is_empty() || t.starts_with('#')
}
