//! Performance command - all-time income, expenses and net cash flow per property

use crate::cmd::{format_money, print_json, read_snapshot};
use clap::Args;
use rentax::core::property_performance;
use std::path::PathBuf;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct PerformanceCommand {
    /// Portfolio snapshot JSON file (or "-" for stdin)
    #[arg(short, long)]
    input: PathBuf,

    /// Output as JSON instead of a formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Tabled)]
struct PerformanceRow {
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Income")]
    income: String,
    #[tabled(rename = "Expenses")]
    expenses: String,
    #[tabled(rename = "Net Cash Flow")]
    net: String,
}

impl PerformanceCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let snapshot = read_snapshot(&self.input)?;
        let performance = property_performance(&snapshot.properties, &snapshot.transactions)?;

        if self.json {
            return print_json(&performance);
        }
        if performance.is_empty() {
            println!("No properties found");
            return Ok(());
        }

        let rows: Vec<_> = performance
            .iter()
            .map(|p| PerformanceRow {
                address: p.address.clone(),
                income: format_money(p.total_income),
                expenses: format_money(p.total_expenses),
                net: format_money(p.net_cash_flow),
            })
            .collect();
        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
        Ok(())
    }
}
