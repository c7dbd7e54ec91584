use num_bigint::{BigInt, BigUint, Sign};

/// Format a raw token amount with `decimals` fractional digits.
///
/// Pure string arithmetic on the base-10 representation, so amounts of any
/// size are exact. Trailing fractional zeros are trimmed and a whole amount
/// carries no decimal point: `1_500_000` at 6 decimals is `"1.5"`, `0` is `"0"`.
pub fn format_units(amount: &BigUint, decimals: u8) -> String {
    let s = amount.to_string();
    let decimals = decimals as usize;

    if decimals == 0 {
        return s;
    }

    let padded = if s.len() < decimals {
        let mut p = "0".repeat(decimals - s.len());
        p.push_str(&s);
        p
    } else {
        s
    };

    let (integer_part, decimal_part) = padded.split_at(padded.len() - decimals);
    let integer_part = if integer_part.is_empty() { "0" } else { integer_part };
    let trimmed = decimal_part.trim_end_matches('0');

    if trimmed.is_empty() {
        integer_part.to_string()
    } else {
        format!("{integer_part}.{trimmed}")
    }
}

/// Signed variant of [`format_units`]; negative amounts get a leading `-`.
pub fn format_signed_units(amount: &BigInt, decimals: u8) -> String {
    let magnitude = format_units(amount.magnitude(), decimals);
    if amount.sign() == Sign::Minus {
        format!("-{magnitude}")
    } else {
        magnitude
    }
}
