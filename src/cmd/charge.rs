//! Charge command - nights and total for a prospective stay

use crate::cmd::{format_money, print_json};
use clap::Args;
use rentax::core::compute_booking_charge;
use rentax::core::money::parse_date_time;
use rust_decimal::Decimal;

#[derive(Args, Debug)]
pub struct ChargeCommand {
    /// Check-in date or datetime (e.g., 2024-03-01 or 2024-03-01T15:00:00)
    #[arg(long)]
    check_in: String,

    /// Check-out date or datetime
    #[arg(long)]
    check_out: String,

    /// Nightly rate
    #[arg(short, long)]
    rate: Decimal,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

impl ChargeCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let check_in = parse_date_time(&self.check_in)?;
        let check_out = parse_date_time(&self.check_out)?;
        let charge = compute_booking_charge(check_in, check_out, self.rate)?;

        if self.json {
            return print_json(&charge);
        }
        let plural = if charge.nights == 1 { "night" } else { "nights" };
        println!(
            "{} {} at {} = {}",
            charge.nights,
            plural,
            format_money(self.rate),
            format_money(charge.total_amount)
        );
        Ok(())
    }
}
