//! Cash-flow command - monthly, per-property and per-category totals for a year

use crate::cmd::{format_money, print_json, read_snapshot, write_csv};
use clap::Args;
use rentax::core::{aggregate_cash_flow, CashFlowSummary, Transaction};
use std::path::PathBuf;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Args, Debug)]
pub struct CashFlowCommand {
    /// Portfolio snapshot JSON file (or "-" for stdin)
    #[arg(short, long)]
    input: PathBuf,

    /// Calendar year to aggregate
    #[arg(short, long)]
    year: i32,

    /// Only include transactions for this property
    #[arg(short, long)]
    property: Option<i64>,

    /// Output as JSON instead of formatted tables
    #[arg(long, conflicts_with = "csv")]
    json: bool,

    /// Output the monthly series as CSV
    #[arg(long)]
    csv: bool,
}

#[derive(Tabled)]
struct MonthRow {
    #[tabled(rename = "Month")]
    month: &'static str,
    #[tabled(rename = "Income")]
    income: String,
    #[tabled(rename = "Expense")]
    expense: String,
    #[tabled(rename = "Net")]
    net: String,
}

#[derive(Tabled)]
struct PropertyRow {
    #[tabled(rename = "Property")]
    property: String,
    #[tabled(rename = "Income")]
    income: String,
    #[tabled(rename = "Expense")]
    expense: String,
    #[tabled(rename = "Net")]
    net: String,
}

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Type")]
    transaction_type: &'static str,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

impl CashFlowCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let snapshot = read_snapshot(&self.input)?;
        let transactions: Vec<Transaction> = snapshot
            .transactions
            .into_iter()
            .filter(|tx| self.property.map_or(true, |id| tx.property_id == id))
            .collect();
        let summary = aggregate_cash_flow(&transactions, self.year)?;

        if self.json {
            print_json(&summary)
        } else if self.csv {
            write_csv(&summary.monthly)
        } else {
            self.print_tables(&summary, &snapshot.properties);
            Ok(())
        }
    }

    fn print_tables(&self, summary: &CashFlowSummary, properties: &[rentax::core::Property]) {
        println!();
        println!("CASH FLOW {}", summary.year);
        println!();

        let months: Vec<_> = summary
            .monthly
            .iter()
            .map(|m| MonthRow {
                month: MONTHS[(m.month - 1) as usize],
                income: format_money(m.income),
                expense: format_money(m.expense),
                net: format_money(m.net),
            })
            .collect();
        println!("{}", right_aligned(Table::new(months)));

        if !summary.by_property.is_empty() {
            let rows: Vec<_> = summary
                .by_property
                .iter()
                .map(|p| PropertyRow {
                    property: properties
                        .iter()
                        .find(|prop| prop.id == p.property_id)
                        .map_or_else(|| p.property_id.to_string(), |prop| prop.address.clone()),
                    income: format_money(p.income),
                    expense: format_money(p.expense),
                    net: format_money(p.net),
                })
                .collect();
            println!();
            println!("{}", right_aligned(Table::new(rows)));
        }

        if !summary.by_category.is_empty() {
            let rows: Vec<_> = summary
                .by_category
                .iter()
                .map(|c| CategoryRow {
                    transaction_type: c.transaction_type.display(),
                    category: c.category.clone(),
                    amount: format_money(c.amount),
                })
                .collect();
            println!();
            println!("{}", right_aligned(Table::new(rows)));
        }
    }
}

fn right_aligned(mut table: Table) -> String {
    table
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string()
}
