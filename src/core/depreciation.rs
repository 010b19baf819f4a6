//! Straight-line, bonus and Section 179 depreciation per property and year.
//!
//! Deductions are taken in the order the IRS applies them: Section 179 first, then bonus
//! depreciation on what is left, then MACRS straight-line over the recovery period on the
//! remainder. Only the business-use share of the purchase price is ever eligible.

use super::error::{EngineError, Result};
use super::money::{checked_add, checked_mul, ensure_non_negative, round_currency};
use super::property::Property;
use super::tax_year::TaxYear;
use chrono::{Datelike, NaiveDate};
use rentax_derive::FieldDocs;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// User-entered depreciation for a property and year; overrides the computed values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, FieldDocs)]
pub struct DepreciationRecord {
    /// Record identifier, if stored
    #[serde(default)]
    pub id: Option<i64>,
    /// Property the record belongs to
    pub property_id: i64,
    /// Tax year, 2000-2100
    pub year: i32,
    /// Straight-line depreciation for the year
    #[schemars(with = "f64")]
    pub straight_line: Decimal,
    /// Bonus depreciation for the year
    #[serde(default)]
    #[schemars(with = "f64")]
    pub bonus_depreciation: Decimal,
}

impl DepreciationRecord {
    pub fn total_depreciation(&self) -> Decimal {
        self.straight_line + self.bonus_depreciation
    }

    pub fn validate(&self) -> Result<()> {
        TaxYear::new(self.year)?;
        ensure_non_negative("straight_line", self.straight_line)?;
        ensure_non_negative("bonus_depreciation", self.bonus_depreciation)?;
        Ok(())
    }
}

/// Depreciation of one property for one year
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepreciationOutput {
    pub property_id: i64,
    pub year: i32,
    pub straight_line: Decimal,
    pub bonus_depreciation: Decimal,
    pub section_179_deduction: Decimal,
    pub total_depreciation: Decimal,
    pub placed_in_service_date: Option<NaiveDate>,
    pub business_use_percentage: Decimal,
}

/// Section 179 and bonus amounts claimed in the placed-in-service year.
#[derive(Debug, Clone, Copy, Default)]
struct FirstYearAllowances {
    section_179: Decimal,
    bonus: Decimal,
}

fn first_year_allowances(
    property: &Property,
    placed: NaiveDate,
    basis: Decimal,
) -> FirstYearAllowances {
    let placed_year = TaxYear::from_date(placed);
    let section_179 = property
        .section_179_election
        .min(basis)
        .min(placed_year.section_179_limit());
    let bonus = if property.elect_bonus {
        round_currency((basis - section_179) * placed_year.bonus_rate())
    } else {
        Decimal::ZERO
    };
    FirstYearAllowances { section_179, bonus }
}

/// Straight-line taken from the placed-in-service date through the end of `year`,
/// before capping at the depreciable basis.
///
/// The first year uses the mid-month convention: service starts halfway through the
/// month the property was placed in service.
fn cumulative_straight_line(annual: Decimal, placed: NaiveDate, year: i32) -> Result<Decimal> {
    let placed_year = placed.year();
    if year < placed_year {
        return Ok(Decimal::ZERO);
    }
    let first_year_fraction = (dec!(12.5) - Decimal::from(placed.month())) / dec!(12);
    let full_years = Decimal::from(year - placed_year);
    checked_add(
        checked_mul(annual, first_year_fraction, "straight-line")?,
        checked_mul(annual, full_years, "straight-line")?,
        "straight-line",
    )
}

fn straight_line_for_year(
    property: &Property,
    placed: NaiveDate,
    depreciable: Decimal,
    year: i32,
) -> Result<Decimal> {
    let Some(recovery_years) = property.property_type.recovery_years() else {
        return Ok(Decimal::ZERO);
    };
    if depreciable.is_zero() {
        return Ok(Decimal::ZERO);
    }
    let annual = depreciable / recovery_years;
    let through = |y: i32| -> Result<Decimal> {
        Ok(round_currency(
            cumulative_straight_line(annual, placed, y)?.min(depreciable),
        ))
    };
    // Differences of rounded running totals never sum past the basis.
    Ok((through(year)? - through(year - 1)?).max(Decimal::ZERO))
}

/// Depreciation of a property for a year.
///
/// When `override_record` is given its straight-line and bonus amounts are used as-is;
/// Section 179 is always derived from the property's election.
pub fn compute_depreciation(
    property: &Property,
    year: i32,
    override_record: Option<&DepreciationRecord>,
) -> Result<DepreciationOutput> {
    let tax_year = TaxYear::new(year)?;
    property.validate()?;
    if let Some(record) = override_record {
        if record.property_id != property.id || record.year != year {
            return Err(EngineError::OverrideMismatch {
                property: property.id,
                year,
                record_property: record.property_id,
                record_year: record.year,
            });
        }
        record.validate()?;
    }

    let basis = property.business_basis()?;
    let (section_179, bonus, straight_line) = match property.placed_in_service_date {
        Some(placed) => {
            let allowances = first_year_allowances(property, placed, basis);
            let depreciable =
                (basis - allowances.section_179 - allowances.bonus).max(Decimal::ZERO);
            let straight_line = straight_line_for_year(property, placed, depreciable, year)?;
            if tax_year.contains(placed) {
                (allowances.section_179, allowances.bonus, straight_line)
            } else {
                (Decimal::ZERO, Decimal::ZERO, straight_line)
            }
        }
        None => {
            if override_record.is_none() {
                log::warn!(
                    "Property {} has no placed-in-service date, no depreciation computed",
                    property.id
                );
            }
            (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO)
        }
    };

    let (straight_line, bonus) = match override_record {
        Some(record) => (record.straight_line, record.bonus_depreciation),
        None => (straight_line, bonus),
    };
    let total_depreciation = checked_add(straight_line, bonus, "total depreciation")?;

    log::debug!(
        "Depreciation property={} year={}: straight_line={} bonus={} section_179={}{}",
        property.id,
        year,
        straight_line,
        bonus,
        section_179,
        if override_record.is_some() { " (override)" } else { "" }
    );

    Ok(DepreciationOutput {
        property_id: property.id,
        year,
        straight_line,
        bonus_depreciation: bonus,
        section_179_deduction: section_179,
        total_depreciation,
        placed_in_service_date: property.placed_in_service_date,
        business_use_percentage: property.business_use_percentage,
    })
}

/// Depreciation records keyed by (property, year); at most one record per key.
#[derive(Debug, Clone, Default)]
pub struct DepreciationSchedule {
    records: BTreeMap<(i64, i32), DepreciationRecord>,
}

impl DepreciationSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = DepreciationRecord>,
    {
        let mut schedule = Self::new();
        for record in records {
            schedule.insert(record)?;
        }
        Ok(schedule)
    }

    /// Add a record, failing if the property already has one for that year
    pub fn insert(&mut self, record: DepreciationRecord) -> Result<()> {
        record.validate()?;
        let key = (record.property_id, record.year);
        if self.records.contains_key(&key) {
            return Err(EngineError::DuplicateDepreciationRecord {
                property: record.property_id,
                year: record.year,
            });
        }
        self.records.insert(key, record);
        Ok(())
    }

    pub fn get(&self, property_id: i64, year: i32) -> Option<&DepreciationRecord> {
        self.records.get(&(property_id, year))
    }

    pub fn records(&self) -> impl Iterator<Item = &DepreciationRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Portfolio-wide depreciation recorded for one year
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearlyDepreciation {
    pub year: i32,
    pub straight_line_total: Decimal,
    pub bonus_depreciation_total: Decimal,
    pub total_depreciation: Decimal,
}

/// Recorded depreciation summed per year, most recent year first
pub fn yearly_totals(schedule: &DepreciationSchedule) -> Result<Vec<YearlyDepreciation>> {
    let mut by_year: BTreeMap<i32, (Decimal, Decimal)> = BTreeMap::new();
    for record in schedule.records() {
        let (straight_line, bonus) = by_year.entry(record.year).or_default();
        *straight_line = checked_add(*straight_line, record.straight_line, "straight-line")?;
        *bonus = checked_add(*bonus, record.bonus_depreciation, "bonus depreciation")?;
    }

    by_year
        .into_iter()
        .rev()
        .map(|(year, (straight_line, bonus))| -> Result<YearlyDepreciation> {
            Ok(YearlyDepreciation {
                year,
                straight_line_total: straight_line,
                bonus_depreciation_total: bonus,
                total_depreciation: checked_add(straight_line, bonus, "total depreciation")?,
            })
        })
        .collect()
}
