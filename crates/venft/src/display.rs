//! Text for rendering a lookup: titles, labels, owner links, unlock dates.

use serde::Serialize;
use time::macros::format_description;
use time::OffsetDateTime;

use crate::lookup::LookupResult;
use crate::registry::Registry;

pub const DEBANK_PROFILE_URL: &str = "https://debank.com/profile/";

/// Registry keys sharing a network, for a grouped selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkGroup {
    pub network: &'static str,
    pub keys: Vec<String>,
}

pub fn group_by_network(registry: &Registry) -> Vec<NetworkGroup> {
    registry
        .grouped_by_network()
        .into_iter()
        .map(|(network, keys)| NetworkGroup {
            network,
            keys: keys.into_iter().map(str::to_string).collect(),
        })
        .collect()
}

/// Page heading for the selected key, generic when none is selected.
pub fn heading(key: Option<&str>) -> String {
    match key {
        Some(key) if !key.is_empty() => format!("Lookup {key} data"),
        _ => "Lookup veNFT data".to_string(),
    }
}

/// Display-ready fields of a [`LookupResult`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultView {
    pub title: String,
    pub id: String,
    pub owner: String,
    pub owner_link: Option<String>,
    pub balance: String,
    pub locked_label: String,
    pub locked: String,
    pub usd_value: Option<f64>,
    pub unlock: String,
}

impl ResultView {
    pub fn new(key: &str, result: &LookupResult) -> Self {
        let owner = result.owner.to_checksum(None);
        let owner_link = (!result.owner.is_zero()).then(|| format!("{DEBANK_PROFILE_URL}{owner}"));
        Self {
            title: format!("{key} ID"),
            id: result.id.clone(),
            owner,
            owner_link,
            balance: result.balance.clone(),
            locked_label: locked_label(key),
            locked: result.amount.clone(),
            usd_value: usd_value(result),
            unlock: unlock_text(result.end),
        }
    }
}

/// `veAero` -> `Aero Locked`. Only the first `ve` is removed.
pub fn locked_label(key: &str) -> String {
    format!("{} Locked", key.replacen("ve", "", 1))
}

/// Price times locked amount; `None` when either is zero.
pub fn usd_value(result: &LookupResult) -> Option<f64> {
    if result.price == 0.0 || result.amount == "0" {
        return None;
    }
    let amount: f64 = result.amount.parse().ok()?;
    Some(result.price * amount)
}

/// Unlock date as `Tue, 01 Jan 2030 00:00:00 GMT`, or `-` for a lock with no end.
///
/// Timestamps outside the calendar range fall back to the raw number.
pub fn unlock_text(end: u64) -> String {
    if end == 0 {
        return "-".to_string();
    }
    let format = format_description!(
        "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
    );
    i64::try_from(end)
        .ok()
        .and_then(|ts| OffsetDateTime::from_unix_timestamp(ts).ok())
        .and_then(|dt| dt.format(format).ok())
        .unwrap_or_else(|| end.to_string())
}

/// Group the integer digits of a decimal string and round it to at most
/// three fractional digits (half up): `1234567.8915` -> `1,234,567.892`.
pub fn format_grouped(amount: &str) -> String {
    let (negative, digits) = match amount.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, amount),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));

    let padded_frac = frac_part.bytes().chain(std::iter::repeat(b'0')).take(3);
    let mut kept: Vec<u8> = int_part.bytes().chain(padded_frac).collect();
    if frac_part.as_bytes().get(3).is_some_and(|&d| d >= b'5') {
        round_up(&mut kept);
    }

    let (int_digits, frac_digits) = kept.split_at(kept.len() - 3);
    let int_digits = std::str::from_utf8(int_digits).unwrap_or("0");
    let int_digits = if int_digits.is_empty() { "0" } else { int_digits };
    let frac_digits = std::str::from_utf8(frac_digits).unwrap_or("").trim_end_matches('0');

    let mut out = String::new();
    if negative && (int_digits.bytes().any(|d| d != b'0') || !frac_digits.is_empty()) {
        out.push('-');
    }
    for (i, c) in int_digits.chars().enumerate() {
        if i > 0 && (int_digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if !frac_digits.is_empty() {
        out.push('.');
        out.push_str(frac_digits);
    }
    out
}

fn round_up(digits: &mut Vec<u8>) {
    for d in digits.iter_mut().rev() {
        if *d == b'9' {
            *d = b'0';
        } else {
            *d += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}
