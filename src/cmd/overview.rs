//! Overview command - portfolio value, appreciation and carrying costs

use crate::cmd::{format_money, print_json, read_snapshot};
use clap::Args;
use rentax::core::portfolio_overview;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct OverviewCommand {
    /// Portfolio snapshot JSON file (or "-" for stdin)
    #[arg(short, long)]
    input: PathBuf,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

impl OverviewCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let snapshot = read_snapshot(&self.input)?;
        let overview = portfolio_overview(&snapshot.properties)?;

        if self.json {
            return print_json(&overview);
        }
        let appreciation = match overview.appreciation_percentage {
            Some(pct) => format!("{} ({}%)", format_money(overview.total_appreciation), pct),
            None => format_money(overview.total_appreciation),
        };

        println!();
        println!("PORTFOLIO OVERVIEW");
        println!();
        println!("{:<24} {:>20}", "Properties", overview.total_properties);
        println!("{:<24} {:>20}", "Purchase value", format_money(overview.total_purchase_value));
        println!("{:<24} {:>20}", "Current value", format_money(overview.total_portfolio_value));
        println!("{:<24} {:>20}", "Appreciation", appreciation);
        println!("{:<24} {:>20}", "Monthly rent", format_money(overview.total_monthly_rent));
        println!(
            "{:<24} {:>20}",
            "Annual carrying costs",
            format_money(overview.annual_carrying_costs)
        );
        Ok(())
    }
}
