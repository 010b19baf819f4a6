//! Decimal currency helpers and stay date math.

use super::error::{EngineError, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer};

/// Round to whole cents, half-up (midpoint away from zero).
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Number of nights charged for a stay: the span in days rounded up.
///
/// A stay of exactly 24 hours is one night, 36 hours is two. Any part of a day counts,
/// down to sub-second precision.
pub fn stay_nights(check_in: NaiveDateTime, check_out: NaiveDateTime) -> Result<i64> {
    if check_out <= check_in {
        return Err(EngineError::InvalidStay {
            check_in,
            check_out,
        });
    }
    let span = check_out - check_in;
    let whole_days = span.num_days();
    let partial = span - Duration::days(whole_days) > Duration::zero();
    Ok(whole_days + i64::from(partial))
}

pub fn checked_add(a: Decimal, b: Decimal, what: &'static str) -> Result<Decimal> {
    a.checked_add(b).ok_or(EngineError::Overflow(what))
}

pub fn checked_mul(a: Decimal, b: Decimal, what: &'static str) -> Result<Decimal> {
    a.checked_mul(b).ok_or(EngineError::Overflow(what))
}

/// Sum with overflow reported as a computation error instead of a panic.
pub fn checked_sum<I>(amounts: I, what: &'static str) -> Result<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, amount| checked_add(acc, amount, what))
}

pub fn ensure_non_negative(field: &'static str, value: Decimal) -> Result<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(EngineError::NegativeAmount { field, value });
    }
    Ok(())
}

/// Parse a date or datetime. Date-only input means midnight.
pub fn parse_date_time(s: &str) -> Result<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }
    Err(EngineError::InvalidDate(s.to_string()))
}

pub(crate) fn deserialize_date_time<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    parse_date_time(&s).map_err(|err| serde::de::Error::custom(err.to_string()))
}

/// Accepts a datetime where a date is expected and keeps the date part.
pub(crate) fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_date_time(deserializer).map(|dt| dt.date())
}

pub(crate) fn deserialize_opt_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Deserialize::deserialize(deserializer)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_date_time(s)
            .map(|dt| Some(dt.date()))
            .map_err(|err| serde::de::Error::custom(err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn dt(s: &str) -> NaiveDateTime {
        parse_date_time(s).unwrap()
    }

    #[test]
    fn rounds_half_up() {
        assert_eq!(round_currency(dec!(10.005)), dec!(10.01));
        assert_eq!(round_currency(dec!(10.004)), dec!(10.00));
        assert_eq!(round_currency(dec!(0.125)), dec!(0.13));
        assert_eq!(round_currency(dec!(-0.125)), dec!(-0.13));
    }

    #[test]
    fn full_day_is_one_night() {
        assert_eq!(stay_nights(dt("2024-03-01"), dt("2024-03-02")).unwrap(), 1);
    }

    #[test]
    fn partial_day_rounds_up() {
        assert_eq!(
            stay_nights(dt("2024-03-01T00:00:00"), dt("2024-03-02T12:00:00")).unwrap(),
            2
        );
        assert_eq!(
            stay_nights(dt("2024-03-01T00:00:00"), dt("2024-03-01T12:00:00")).unwrap(),
            1
        );
    }

    #[test]
    fn sub_second_stay_is_one_night() {
        let check_in = dt("2024-03-01T00:00:00.000");
        let check_out = dt("2024-03-01T00:00:00.500");
        assert_eq!(stay_nights(check_in, check_out).unwrap(), 1);
        assert_eq!(
            stay_nights(dt("2024-03-01"), dt("2024-03-02T00:00:00.001")).unwrap(),
            2
        );
    }

    #[test]
    fn stay_across_month_end() {
        assert_eq!(stay_nights(dt("2024-02-27"), dt("2024-03-02")).unwrap(), 4);
    }

    #[test]
    fn empty_or_reversed_stay_rejected() {
        assert!(matches!(
            stay_nights(dt("2024-03-02"), dt("2024-03-02")),
            Err(EngineError::InvalidStay { .. })
        ));
        assert!(matches!(
            stay_nights(dt("2024-03-03"), dt("2024-03-02")),
            Err(EngineError::InvalidStay { .. })
        ));
    }

    #[test]
    fn parses_supported_formats() {
        assert_eq!(dt("2024-03-01"), dt("2024-03-01T00:00:00"));
        assert_eq!(dt("2024-03-01 15:30:00"), dt("2024-03-01T15:30:00"));
        assert!(parse_date_time("03/01/2024").is_err());
    }

    #[test]
    fn sum_reports_overflow() {
        assert_eq!(
            checked_sum([Decimal::MAX, dec!(1)], "total"),
            Err(EngineError::Overflow("total"))
        );
        assert_eq!(checked_sum([dec!(1.5), dec!(2.25)], "total"), Ok(dec!(3.75)));
    }

    #[test]
    fn negative_zero_is_not_negative() {
        assert!(ensure_non_negative("amount", dec!(-0)).is_ok());
        assert!(ensure_non_negative("amount", dec!(-0.01)).is_err());
    }
}
