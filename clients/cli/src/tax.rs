//! IGV derivation and numeric input sanitising.

use crate::consts::cli_consts::tax::{MONEY_SCALE, igv_rate};
use crate::models::TipoTributario;
use rust_decimal::{Decimal, RoundingStrategy};

/// IGV owed on `base`.
///
/// Only `GRAVADA` amounts carry tax. No treatment at all (flat-tax regime) is
/// zero as well.
pub fn derive_igv(base: Decimal, tipo: Option<TipoTributario>) -> Decimal {
    match tipo {
        Some(TipoTributario::Gravada) => round_money(base * igv_rate()),
        Some(TipoTributario::Exonerada) | Some(TipoTributario::Inafecta) | None => {
            round_money(Decimal::ZERO)
        }
    }
}

/// Rounds half away from zero and always keeps two decimal places.
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// Month-over-month change in percent, `None` when there is no previous figure.
pub fn variation_percent(current: Decimal, previous: Decimal) -> Option<Decimal> {
    if previous.is_zero() {
        return None;
    }
    let change = (current - previous) / previous * Decimal::ONE_HUNDRED;
    Some(change.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero))
}

/// Keeps the ASCII digits of `input`, at most `max_len` of them.
pub fn digits_only(input: &str, max_len: Option<usize>) -> String {
    let digits = input.chars().filter(char::is_ascii_digit);
    match max_len {
        Some(max) => digits.take(max).collect(),
        None => digits.collect(),
    }
}

/// Keeps digits and the first decimal point.
pub fn decimal_only(input: &str) -> String {
    let mut seen_point = false;
    input
        .chars()
        .filter(|c| match c {
            '0'..='9' => true,
            '.' if !seen_point => {
                seen_point = true;
                true
            }
            _ => false,
        })
        .collect()
}

/// Parses a sanitised amount. Blank input is zero.
pub fn parse_amount(input: &str) -> Option<Decimal> {
    let cleaned = decimal_only(input);
    if cleaned.is_empty() {
        return Some(Decimal::ZERO);
    }
    cleaned.parse::<Decimal>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn gravada_pays_eighteen_percent() {
        let igv = derive_igv(dec("100"), Some(TipoTributario::Gravada));
        assert_eq!(igv, dec("18.00"));
        assert_eq!(igv.to_string(), "18.00");
    }

    #[test]
    fn igv_rounds_half_away_from_zero() {
        // 0.25 * 0.18 = 0.045
        assert_eq!(derive_igv(dec("0.25"), Some(TipoTributario::Gravada)), dec("0.05"));
        assert_eq!(derive_igv(dec("1234.56"), Some(TipoTributario::Gravada)), dec("222.22"));
    }

    #[test]
    fn exempt_and_unaffected_pay_nothing() {
        assert_eq!(derive_igv(dec("100"), Some(TipoTributario::Exonerada)), Decimal::ZERO);
        assert_eq!(derive_igv(dec("100"), Some(TipoTributario::Inafecta)), Decimal::ZERO);
        assert_eq!(derive_igv(dec("100"), None).to_string(), "0.00");
    }

    #[test]
    fn variation_needs_previous_month() {
        assert_eq!(variation_percent(dec("150"), dec("100")), Some(dec("50.0")));
        assert_eq!(variation_percent(dec("50"), dec("200")), Some(dec("-75.0")));
        assert_eq!(variation_percent(dec("50"), Decimal::ZERO), None);
    }

    #[test]
    fn digits_are_sanitised_not_rejected() {
        assert_eq!(digits_only("20-123.456 789", None), "20123456789");
        assert_eq!(digits_only("2012345678901", Some(11)), "20123456789");
        assert_eq!(digits_only("abc", Some(8)), "");
    }

    #[test]
    fn decimal_keeps_first_point() {
        assert_eq!(decimal_only("S/ 1,250.50.3"), "1250.503");
        assert_eq!(parse_amount("12.5"), Some(dec("12.5")));
        assert_eq!(parse_amount(""), Some(Decimal::ZERO));
        assert_eq!(parse_amount("."), None);
    }
}
