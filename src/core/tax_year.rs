use super::error::{EngineError, Result};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub const MIN_YEAR: i32 = 2000;
pub const MAX_YEAR: i32 = 2100;

/// US federal tax year (calendar year).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaxYear(i32);

impl TaxYear {
    /// Create a tax year, rejecting years outside 2000-2100
    pub fn new(year: i32) -> Result<Self> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(EngineError::YearOutOfRange(year));
        }
        Ok(TaxYear(year))
    }

    pub fn year(&self) -> i32 {
        self.0
    }

    pub fn from_date(date: NaiveDate) -> Self {
        TaxYear(date.year())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.0
    }

    /// First-year bonus depreciation rate for property placed in service this year.
    pub fn bonus_rate(&self) -> Decimal {
        match self.0 {
            // TCJA phase-down
            2027.. => dec!(0),
            2026 => dec!(0.20),
            2025 => dec!(0.40),
            2024 => dec!(0.60),
            2023 => dec!(0.80),
            2018..=2022 => dec!(1.00),
            2008..=2017 => dec!(0.50),
            2003..=2004 => dec!(0.50),
            2001..=2002 => dec!(0.30),
            _ => dec!(0),
        }
    }

    /// Maximum Section 179 deduction for the year.
    pub fn section_179_limit(&self) -> Decimal {
        match self.0 {
            2026.. => dec!(2560000),
            2025 => dec!(2500000),
            2024 => dec!(1220000),
            2023 => dec!(1160000),
            2022 => dec!(1080000),
            2021 => dec!(1050000),
            2020 => dec!(1040000),
            2019 => dec!(1020000),
            2018 => dec!(1000000),
            2017 => dec!(510000),
            2016 => dec!(500000),
            2010..=2015 => dec!(500000),
            2008..=2009 => dec!(250000),
            2003..=2007 => dec!(125000),
            // Earlier years: approximate
            _ => dec!(24000),
        }
    }
}

impl std::fmt::Display for TaxYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_is_enforced() {
        assert_eq!(TaxYear::new(1999), Err(EngineError::YearOutOfRange(1999)));
        assert_eq!(TaxYear::new(2101), Err(EngineError::YearOutOfRange(2101)));
        assert_eq!(TaxYear::new(2000), Ok(TaxYear(2000)));
        assert_eq!(TaxYear::new(2100).map(|y| y.year()), Ok(2100));
    }

    #[test]
    fn dates_always_fall_in_their_year() {
        let date = NaiveDate::from_ymd_opt(2031, 7, 4).unwrap();
        let ty = TaxYear::from_date(date);
        assert_eq!(ty.year(), 2031);
        assert!(ty.contains(date));
    }

    #[test]
    fn contains_matches_calendar_year() {
        let ty = TaxYear(2024);
        assert!(ty.contains(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));
        assert!(ty.contains(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()));
        assert!(!ty.contains(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()));
    }

    #[test]
    fn bonus_phase_down() {
        assert_eq!(TaxYear(2022).bonus_rate(), dec!(1.00));
        assert_eq!(TaxYear(2023).bonus_rate(), dec!(0.80));
        assert_eq!(TaxYear(2024).bonus_rate(), dec!(0.60));
        assert_eq!(TaxYear(2025).bonus_rate(), dec!(0.40));
        assert_eq!(TaxYear(2026).bonus_rate(), dec!(0.20));
        assert_eq!(TaxYear(2027).bonus_rate(), dec!(0));
        assert_eq!(TaxYear(2006).bonus_rate(), dec!(0));
    }

    #[test]
    fn section_179_limits() {
        assert_eq!(TaxYear(2024).section_179_limit(), dec!(1220000));
        assert_eq!(TaxYear(2023).section_179_limit(), dec!(1160000));
        assert_eq!(TaxYear(2018).section_179_limit(), dec!(1000000));
    }
}
