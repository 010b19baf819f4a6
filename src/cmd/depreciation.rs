//! Depreciation command - Section 179, bonus and straight-line depreciation per property

use crate::cmd::{format_money, print_json, read_snapshot};
use clap::Args;
use rentax::core::{compute_depreciation, yearly_totals, DepreciationOutput, YearlyDepreciation};
use serde::Serialize;
use std::path::PathBuf;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct DepreciationCommand {
    /// Portfolio snapshot JSON file (or "-" for stdin)
    #[arg(short, long)]
    input: PathBuf,

    /// Tax year to compute
    #[arg(short, long)]
    year: i32,

    /// Only compute for this property
    #[arg(short, long)]
    property: Option<i64>,

    /// Also show totals of recorded depreciation per year
    #[arg(long)]
    by_year: bool,

    /// Output as JSON instead of formatted tables
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct DepreciationData {
    year: i32,
    properties: Vec<DepreciationOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    by_year: Option<Vec<YearlyDepreciation>>,
}

#[derive(Tabled)]
struct DepreciationRow {
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "In Service")]
    placed: String,
    #[tabled(rename = "Use %")]
    business_use: String,
    #[tabled(rename = "Sec. 179")]
    section_179: String,
    #[tabled(rename = "Bonus")]
    bonus: String,
    #[tabled(rename = "Straight-Line")]
    straight_line: String,
    #[tabled(rename = "Total")]
    total: String,
}

#[derive(Tabled)]
struct YearRow {
    #[tabled(rename = "Year")]
    year: i32,
    #[tabled(rename = "Straight-Line")]
    straight_line: String,
    #[tabled(rename = "Bonus")]
    bonus: String,
    #[tabled(rename = "Total")]
    total: String,
}

impl DepreciationCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let snapshot = read_snapshot(&self.input)?;
        let schedule = snapshot.schedule()?;

        if let Some(id) = self.property {
            if snapshot.property(id).is_none() {
                anyhow::bail!("Property {} not found", id);
            }
        }
        let outputs = snapshot
            .properties
            .iter()
            .filter(|p| self.property.map_or(true, |id| p.id == id))
            .map(|p| compute_depreciation(p, self.year, schedule.get(p.id, self.year)))
            .collect::<Result<Vec<_>, _>>()?;
        let by_year = if self.by_year {
            Some(yearly_totals(&schedule)?)
        } else {
            None
        };

        let data = DepreciationData {
            year: self.year,
            properties: outputs,
            by_year,
        };
        if self.json {
            print_json(&data)
        } else {
            self.print_tables(&data, &snapshot.properties);
            Ok(())
        }
    }

    fn print_tables(&self, data: &DepreciationData, properties: &[rentax::core::Property]) {
        println!();
        println!("DEPRECIATION {}", data.year);
        println!();

        if data.properties.is_empty() {
            println!("No properties found");
        } else {
            let rows: Vec<_> = data
                .properties
                .iter()
                .map(|d| DepreciationRow {
                    address: properties
                        .iter()
                        .find(|p| p.id == d.property_id)
                        .map_or_else(String::new, |p| p.address.clone()),
                    placed: d
                        .placed_in_service_date
                        .map_or_else(|| "-".to_string(), |date| date.to_string()),
                    business_use: format!("{}%", d.business_use_percentage.normalize()),
                    section_179: format_money(d.section_179_deduction),
                    bonus: format_money(d.bonus_depreciation),
                    straight_line: format_money(d.straight_line),
                    total: format_money(d.total_depreciation),
                })
                .collect();
            let table = Table::new(rows)
                .with(Style::rounded())
                .with(Modify::new(Columns::new(2..)).with(Alignment::right()))
                .to_string();
            println!("{}", table);
        }

        if let Some(years) = &data.by_year {
            println!();
            println!("RECORDED DEPRECIATION BY YEAR");
            if years.is_empty() {
                println!("No depreciation records");
                return;
            }
            let rows: Vec<_> = years
                .iter()
                .map(|y| YearRow {
                    year: y.year,
                    straight_line: format_money(y.straight_line_total),
                    bonus: format_money(y.bonus_depreciation_total),
                    total: format_money(y.total_depreciation),
                })
                .collect();
            let table = Table::new(rows)
                .with(Style::rounded())
                .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
                .to_string();
            println!("{}", table);
        }
    }
}
