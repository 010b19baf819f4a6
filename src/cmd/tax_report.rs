//! Tax report command - per-property Schedule E figures, depreciation and required forms

use crate::cmd::{format_money, print_json, read_snapshot, write_csv};
use clap::Args;
use rentax::core::{build_tax_report, TaxReport};
use std::path::PathBuf;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct TaxReportCommand {
    /// Portfolio snapshot JSON file (or "-" for stdin)
    #[arg(short, long)]
    input: PathBuf,

    /// Tax year to report
    #[arg(short, long)]
    year: i32,

    /// Output as JSON instead of formatted text
    #[arg(long, conflicts_with = "csv")]
    json: bool,

    /// Output property rows as CSV
    #[arg(long)]
    csv: bool,
}

#[derive(Tabled)]
struct ReportRow {
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Income")]
    income: String,
    #[tabled(rename = "Expenses")]
    expenses: String,
    #[tabled(rename = "Net")]
    net: String,
    #[tabled(rename = "Sec. 179")]
    section_179: String,
    #[tabled(rename = "Bonus")]
    bonus: String,
    #[tabled(rename = "Straight-Line")]
    straight_line: String,
}

impl TaxReportCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let snapshot = read_snapshot(&self.input)?;
        let report = build_tax_report(
            self.year,
            &snapshot.properties,
            &snapshot.transactions,
            &snapshot.depreciation_records,
        )?;

        if self.json {
            print_json(&report)
        } else if self.csv {
            write_csv(&report.properties)
        } else {
            print_report(&report);
            Ok(())
        }
    }
}

fn print_report(report: &TaxReport) {
    println!();
    println!("TAX REPORT {}", report.year);
    println!();

    if report.properties.is_empty() {
        println!("No properties found");
    } else {
        let rows: Vec<_> = report
            .properties
            .iter()
            .map(|r| ReportRow {
                address: r.address.clone(),
                income: format_money(r.rental_income),
                expenses: format_money(r.other_expenses),
                net: format_money(r.net_rental_income),
                section_179: format_money(r.section_179_deduction),
                bonus: format_money(r.bonus_depreciation),
                straight_line: format_money(r.straight_line_depreciation),
            })
            .collect();
        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
    }

    let t = &report.totals;
    println!();
    println!("{:<28} {:>16}", "Purchase price", format_money(t.total_purchase_price));
    println!("{:<28} {:>16}", "Rental income", format_money(t.total_rental_income));
    println!("{:<28} {:>16}", "Other expenses", format_money(t.total_other_expenses));
    println!("{:<28} {:>16}", "Net rental income", format_money(t.total_net_income));
    println!("{:<28} {:>16}", "Section 179 deduction", format_money(t.total_section_179));
    println!("{:<28} {:>16}", "Bonus depreciation", format_money(t.total_bonus_depreciation));
    println!("{:<28} {:>16}", "Straight-line depreciation", format_money(t.total_straight_line));

    println!();
    if report.forms_needed.is_empty() {
        println!("No forms required");
    } else {
        println!("Forms needed:");
        for form in &report.forms_needed {
            println!("  {:<24} {}", form.identifier(), form.title());
        }
    }
}
