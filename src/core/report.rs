//! Year-scoped tax report combining ledger totals and depreciation per property.

use super::depreciation::{compute_depreciation, DepreciationRecord, DepreciationSchedule};
use super::error::{EngineError, Result};
use super::ledger::{self, LedgerFilter, Transaction};
use super::money::checked_add;
use super::property::Property;
use super::tax_year::TaxYear;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashSet;

/// One property's line in the tax report.
///
/// `net_rental_income` is income minus operating expenses; depreciation is reported in its
/// own columns and not subtracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxReportRow {
    pub property_id: i64,
    pub address: String,
    pub purchase_price: Decimal,
    pub section_179_deduction: Decimal,
    pub bonus_depreciation: Decimal,
    pub straight_line_depreciation: Decimal,
    pub rental_income: Decimal,
    pub other_expenses: Decimal,
    pub net_rental_income: Decimal,
    pub placed_in_service_date: Option<NaiveDate>,
    pub business_use_percentage: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaxReportTotals {
    pub total_purchase_price: Decimal,
    pub total_section_179: Decimal,
    pub total_bonus_depreciation: Decimal,
    pub total_straight_line: Decimal,
    pub total_rental_income: Decimal,
    pub total_other_expenses: Decimal,
    pub total_net_income: Decimal,
}

impl TaxReportTotals {
    /// Elementwise sum of report rows
    pub fn from_rows(rows: &[TaxReportRow]) -> Result<Self> {
        rows.iter().try_fold(Self::default(), |acc, row| {
            Ok(TaxReportTotals {
                total_purchase_price: checked_add(
                    acc.total_purchase_price,
                    row.purchase_price,
                    "purchase price",
                )?,
                total_section_179: checked_add(
                    acc.total_section_179,
                    row.section_179_deduction,
                    "section 179",
                )?,
                total_bonus_depreciation: checked_add(
                    acc.total_bonus_depreciation,
                    row.bonus_depreciation,
                    "bonus depreciation",
                )?,
                total_straight_line: checked_add(
                    acc.total_straight_line,
                    row.straight_line_depreciation,
                    "straight-line",
                )?,
                total_rental_income: checked_add(
                    acc.total_rental_income,
                    row.rental_income,
                    "rental income",
                )?,
                total_other_expenses: checked_add(
                    acc.total_other_expenses,
                    row.other_expenses,
                    "other expenses",
                )?,
                total_net_income: checked_add(
                    acc.total_net_income,
                    row.net_rental_income,
                    "net income",
                )?,
            })
        })
    }
}

/// IRS forms a report can call for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TaxForm {
    #[serde(rename = "schedule-e")]
    ScheduleE,
    #[serde(rename = "form-4562-section-179")]
    Form4562Section179,
    #[serde(rename = "form-4562-bonus")]
    Form4562Bonus,
    #[serde(rename = "form-4562-macrs")]
    Form4562Macrs,
    #[serde(rename = "form-8582")]
    Form8582,
}

impl TaxForm {
    pub fn identifier(self) -> &'static str {
        match self {
            TaxForm::ScheduleE => "schedule-e",
            TaxForm::Form4562Section179 => "form-4562-section-179",
            TaxForm::Form4562Bonus => "form-4562-bonus",
            TaxForm::Form4562Macrs => "form-4562-macrs",
            TaxForm::Form8582 => "form-8582",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            TaxForm::ScheduleE => "Schedule E (Supplemental Income and Loss)",
            TaxForm::Form4562Section179 => "Form 4562 Part I (Section 179 Election)",
            TaxForm::Form4562Bonus => "Form 4562 Part II (Special Depreciation Allowance)",
            TaxForm::Form4562Macrs => "Form 4562 Part III (MACRS Depreciation)",
            TaxForm::Form8582 => "Form 8582 (Passive Activity Loss Limitations)",
        }
    }
}

impl std::fmt::Display for TaxForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// A form and the condition on report totals that calls for it
pub struct FormRule {
    pub form: TaxForm,
    pub applies: fn(&TaxReportTotals) -> bool,
}

/// Every form the report knows about, in output order.
pub const FORM_RULES: &[FormRule] = &[
    FormRule {
        form: TaxForm::ScheduleE,
        applies: |t| t.total_rental_income > Decimal::ZERO,
    },
    FormRule {
        form: TaxForm::Form4562Section179,
        applies: |t| t.total_section_179 > Decimal::ZERO,
    },
    FormRule {
        form: TaxForm::Form4562Bonus,
        applies: |t| t.total_bonus_depreciation > Decimal::ZERO,
    },
    FormRule {
        form: TaxForm::Form4562Macrs,
        applies: |t| t.total_straight_line > Decimal::ZERO,
    },
    FormRule {
        form: TaxForm::Form8582,
        applies: |t| t.total_net_income < Decimal::ZERO,
    },
];

pub fn forms_needed(totals: &TaxReportTotals) -> Vec<TaxForm> {
    FORM_RULES
        .iter()
        .filter(|rule| (rule.applies)(totals))
        .map(|rule| rule.form)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxReport {
    pub year: i32,
    pub properties: Vec<TaxReportRow>,
    pub totals: TaxReportTotals,
    pub forms_needed: Vec<TaxForm>,
}

/// Build the tax report for `year`.
///
/// Rows follow the order of `properties`. Fails without a partial report if any record is
/// invalid, a transaction or depreciation record names an unknown property, or two
/// depreciation records share a property and year.
pub fn build_tax_report(
    year: i32,
    properties: &[Property],
    transactions: &[Transaction],
    depreciation_records: &[DepreciationRecord],
) -> Result<TaxReport> {
    let tax_year = TaxYear::new(year)?;

    let mut known = HashSet::new();
    for property in properties {
        property.validate()?;
        if !known.insert(property.id) {
            return Err(EngineError::DuplicatePropertyId(property.id));
        }
    }
    ledger::validate_transactions(transactions)?;
    if let Some(tx) = transactions.iter().find(|tx| !known.contains(&tx.property_id)) {
        return Err(EngineError::UnknownProperty(tx.property_id));
    }
    if let Some(r) = depreciation_records
        .iter()
        .find(|r| !known.contains(&r.property_id))
    {
        return Err(EngineError::UnknownProperty(r.property_id));
    }
    let schedule = DepreciationSchedule::from_records(depreciation_records.iter().cloned())?;

    let year_filter = LedgerFilter::year(tax_year);
    let rows = properties
        .iter()
        .map(|property| {
            let depreciation =
                compute_depreciation(property, year, schedule.get(property.id, year))?;
            let (rental_income, other_expenses) =
                ledger::sum_by_type(transactions, &year_filter.with_property(property.id))?;

            Ok(TaxReportRow {
                property_id: property.id,
                address: property.address.clone(),
                purchase_price: property.purchase_price,
                section_179_deduction: depreciation.section_179_deduction,
                bonus_depreciation: depreciation.bonus_depreciation,
                straight_line_depreciation: depreciation.straight_line,
                rental_income,
                other_expenses,
                net_rental_income: rental_income - other_expenses,
                placed_in_service_date: property.placed_in_service_date,
                business_use_percentage: property.business_use_percentage,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let totals = TaxReportTotals::from_rows(&rows)?;
    let forms_needed = forms_needed(&totals);
    log::info!(
        "Tax report {}: {} properties, {} forms",
        tax_year,
        rows.len(),
        forms_needed.len()
    );

    Ok(TaxReport {
        year,
        properties: rows,
        totals,
        forms_needed,
    })
}
