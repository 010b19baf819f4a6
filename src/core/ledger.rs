//! Income/expense aggregation over transactions.
//!
//! Every function here is an order-independent reduction: transactions are validated first,
//! then summed into maps keyed by property, month or category.

use super::error::Result;
use super::money::{self, checked_add, ensure_non_negative};
use super::property::Property;
use super::tax_year::TaxYear;
use chrono::{Datelike, NaiveDate};
use rentax_derive::FieldDocs;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Category used for the income transaction paired with every booking
pub const RENTAL_INCOME: &str = "rental_income";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn display(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

/// A single ledger entry; amounts are unsigned, direction comes from the type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, FieldDocs)]
pub struct Transaction {
    /// Unique transaction identifier
    pub id: i64,
    /// Property the money relates to
    pub property_id: i64,
    /// Booking this entry was generated for, informational only
    #[serde(default)]
    pub booking_id: Option<i64>,
    /// income or expense
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Free-form category, e.g. rental_income, repairs, utilities
    pub category: String,
    /// Non-negative amount
    #[schemars(with = "f64")]
    pub amount: Decimal,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Transaction date (YYYY-MM-DD)
    #[serde(deserialize_with = "money::deserialize_date")]
    #[schemars(with = "String")]
    pub date: NaiveDate,
}

/// Restricts which transactions take part in an aggregation. Dates are inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerFilter {
    pub property_id: Option<i64>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl LedgerFilter {
    pub fn year(year: TaxYear) -> Self {
        LedgerFilter {
            property_id: None,
            from: NaiveDate::from_ymd_opt(year.year(), 1, 1),
            to: NaiveDate::from_ymd_opt(year.year(), 12, 31),
        }
    }

    pub fn with_property(self, property_id: i64) -> Self {
        LedgerFilter {
            property_id: Some(property_id),
            ..self
        }
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        self.property_id.is_none_or(|id| tx.property_id == id)
            && self.from.is_none_or(|from| tx.date >= from)
            && self.to.is_none_or(|to| tx.date <= to)
    }
}

/// Running income and expense sums
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Totals {
    income: Decimal,
    expense: Decimal,
}

impl Totals {
    fn add(&mut self, tx: &Transaction) -> Result<()> {
        match tx.transaction_type {
            TransactionType::Income => {
                self.income = checked_add(self.income, tx.amount, "income")?
            }
            TransactionType::Expense => {
                self.expense = checked_add(self.expense, tx.amount, "expense")?
            }
        }
        Ok(())
    }

    fn net(&self) -> Decimal {
        self.income - self.expense
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyTotals {
    pub property_id: i64,
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyCashFlow {
    /// 1-12
    pub month: u32,
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: String,
    pub amount: Decimal,
}

/// Cash flow for one calendar year
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CashFlowSummary {
    pub year: i32,
    pub monthly: Vec<MonthlyCashFlow>,
    pub by_property: Vec<PropertyTotals>,
    pub by_category: Vec<CategoryTotal>,
}

/// All-time performance of a single property
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyPerformance {
    pub property_id: i64,
    pub address: String,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_cash_flow: Decimal,
}

pub fn validate_transactions(transactions: &[Transaction]) -> Result<()> {
    transactions
        .iter()
        .try_for_each(|tx| ensure_non_negative("amount", tx.amount))
}

fn filtered<'a>(
    transactions: &'a [Transaction],
    filter: &'a LedgerFilter,
) -> impl Iterator<Item = &'a Transaction> {
    transactions.iter().filter(move |tx| filter.matches(tx))
}

/// Income, expense and net per property, sorted by property id
pub fn property_totals(
    transactions: &[Transaction],
    filter: &LedgerFilter,
) -> Result<Vec<PropertyTotals>> {
    validate_transactions(transactions)?;

    let mut by_property: BTreeMap<i64, Totals> = BTreeMap::new();
    for tx in filtered(transactions, filter) {
        by_property.entry(tx.property_id).or_default().add(tx)?;
    }

    Ok(by_property
        .into_iter()
        .map(|(property_id, totals)| PropertyTotals {
            property_id,
            income: totals.income,
            expense: totals.expense,
            net: totals.net(),
        })
        .collect())
}

/// Twelve months of income and expense for a year; months without activity are zero
pub fn monthly_series(transactions: &[Transaction], year: TaxYear) -> Result<Vec<MonthlyCashFlow>> {
    validate_transactions(transactions)?;

    let mut months = [Totals::default(); 12];
    for tx in filtered(transactions, &LedgerFilter::year(year)) {
        months[tx.date.month0() as usize].add(tx)?;
    }

    Ok(months
        .iter()
        .zip(1..)
        .map(|(totals, month)| MonthlyCashFlow {
            month,
            income: totals.income,
            expense: totals.expense,
            net: totals.net(),
        })
        .collect())
}

/// Totals per (type, category), sorted by type then category
pub fn category_totals(
    transactions: &[Transaction],
    filter: &LedgerFilter,
) -> Result<Vec<CategoryTotal>> {
    validate_transactions(transactions)?;

    let mut by_category: BTreeMap<(TransactionType, &str), Decimal> = BTreeMap::new();
    for tx in filtered(transactions, filter) {
        let entry = by_category
            .entry((tx.transaction_type, tx.category.as_str()))
            .or_default();
        *entry = checked_add(*entry, tx.amount, "category total")?;
    }

    Ok(by_category
        .into_iter()
        .map(|((transaction_type, category), amount)| CategoryTotal {
            transaction_type,
            category: category.to_string(),
            amount,
        })
        .collect())
}

/// Monthly, per-property and per-category cash flow for a year
pub fn aggregate_cash_flow(transactions: &[Transaction], year: i32) -> Result<CashFlowSummary> {
    let year = TaxYear::new(year)?;
    let filter = LedgerFilter::year(year);

    let summary = CashFlowSummary {
        year: year.year(),
        monthly: monthly_series(transactions, year)?,
        by_property: property_totals(transactions, &filter)?,
        by_category: category_totals(transactions, &filter)?,
    };
    log::debug!(
        "Cash flow {}: {} transactions across {} properties",
        year,
        filtered(transactions, &filter).count(),
        summary.by_property.len()
    );
    Ok(summary)
}

/// All-time performance for every property, best net cash flow first.
///
/// Properties without transactions are included with zero totals. Ties keep property id order.
pub fn property_performance(
    properties: &[Property],
    transactions: &[Transaction],
) -> Result<Vec<PropertyPerformance>> {
    let totals = property_totals(transactions, &LedgerFilter::default())?;
    let totals: BTreeMap<i64, &PropertyTotals> =
        totals.iter().map(|t| (t.property_id, t)).collect();

    let mut rows: Vec<PropertyPerformance> = properties
        .iter()
        .map(|p| {
            let (income, expense) = totals
                .get(&p.id)
                .map_or((Decimal::ZERO, Decimal::ZERO), |t| (t.income, t.expense));
            PropertyPerformance {
                property_id: p.id,
                address: p.address.clone(),
                total_income: income,
                total_expenses: expense,
                net_cash_flow: income - expense,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.net_cash_flow
            .cmp(&a.net_cash_flow)
            .then(a.property_id.cmp(&b.property_id))
    });
    Ok(rows)
}

/// Sum of income and expense transactions, e.g. for one property and year
pub(crate) fn sum_by_type(
    transactions: &[Transaction],
    filter: &LedgerFilter,
) -> Result<(Decimal, Decimal)> {
    let income = money::checked_sum(
        filtered(transactions, filter)
            .filter(|tx| tx.transaction_type == TransactionType::Income)
            .map(|tx| tx.amount),
        "income",
    )?;
    let expense = money::checked_sum(
        filtered(transactions, filter)
            .filter(|tx| tx.transaction_type == TransactionType::Expense)
            .map(|tx| tx.amount),
        "expense",
    )?;
    Ok((income, expense))
}
