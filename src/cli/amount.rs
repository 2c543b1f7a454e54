// Coin amounts as typed by people: decimal coins <-> base units

use crate::Amount;

/// Base units per coin
pub const UNITS_PER_COIN: Amount = 1_000_000_000;

const DECIMALS: usize = 9;

/// Parse a decimal coin amount such as `0.2` or `15` into base units
pub fn parse_coins(s: &str) -> Result<Amount, String> {
    let s = s.trim();
    let (whole, frac) = match s.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (s, ""),
    };

    if whole.is_empty() && frac.is_empty() {
        return Err("empty amount".to_string());
    }
    if frac.len() > DECIMALS {
        return Err(format!("at most {} decimal places", DECIMALS));
    }
    if !whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
        return Err(format!("'{}' is not a decimal amount", s));
    }

    let whole: Amount = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| format!("'{}' is too large", s))?
    };
    let frac: Amount = if frac.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", frac, width = DECIMALS);
        padded.parse().map_err(|_| format!("'{}' is not a decimal amount", s))?
    };

    whole
        .checked_mul(UNITS_PER_COIN)
        .and_then(|v| v.checked_add(frac))
        .ok_or_else(|| format!("'{}' is too large", s))
}

/// Render base units as a decimal coin amount without trailing zeros
pub fn format_coins(amount: Amount) -> String {
    let whole = amount / UNITS_PER_COIN;
    let frac = amount % UNITS_PER_COIN;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{:0>width$}", frac, width = DECIMALS);
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}
