//! Bookings command - list stays with nights and totals, plus summary statistics

use crate::cmd::{format_money, print_json, read_snapshot};
use clap::Args;
use rentax::core::money::stay_nights;
use rentax::core::{booking_stats, Booking, BookingStats};
use serde::Serialize;
use std::path::PathBuf;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct BookingsCommand {
    /// Portfolio snapshot JSON file (or "-" for stdin)
    #[arg(short, long)]
    input: PathBuf,

    /// Only include bookings for this property
    #[arg(short, long)]
    property: Option<i64>,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct BookingsData<'a> {
    stats: BookingStats,
    bookings: &'a [Booking],
}

#[derive(Tabled)]
struct BookingRow {
    #[tabled(rename = "#")]
    id: i64,
    #[tabled(rename = "Guest")]
    guest: String,
    #[tabled(rename = "Check-in")]
    check_in: String,
    #[tabled(rename = "Check-out")]
    check_out: String,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Nights")]
    nights: i64,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Total")]
    total: String,
}

impl BookingsCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let snapshot = read_snapshot(&self.input)?;
        let bookings: Vec<Booking> = snapshot
            .bookings
            .into_iter()
            .filter(|b| self.property.map_or(true, |id| b.property_id == id))
            .collect();
        let stats = booking_stats(&bookings)?;

        if self.json {
            return print_json(&BookingsData {
                stats,
                bookings: &bookings,
            });
        }

        if bookings.is_empty() {
            println!("No bookings found");
        } else {
            let rows = bookings
                .iter()
                .map(|b| {
                    Ok(BookingRow {
                        id: b.id,
                        guest: b.guest_name.clone(),
                        check_in: b.check_in_date.format("%Y-%m-%d %H:%M").to_string(),
                        check_out: b.check_out_date.format("%Y-%m-%d %H:%M").to_string(),
                        status: b.status.display(),
                        nights: stay_nights(b.check_in_date, b.check_out_date)?,
                        rate: format_money(b.nightly_rate),
                        total: format_money(b.total_amount),
                    })
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            let table = Table::new(rows)
                .with(Style::rounded())
                .with(Modify::new(Columns::new(5..)).with(Alignment::right()))
                .to_string();
            println!("{}", table);
        }

        println!();
        println!("{:<20} {:>14}", "Bookings", stats.total_bookings);
        println!("{:<20} {:>14}", "Confirmed", stats.confirmed_bookings);
        println!("{:<20} {:>14}", "Completed", stats.completed_bookings);
        println!("{:<20} {:>14}", "Total revenue", format_money(stats.total_revenue));
        println!("{:<20} {:>14}", "Avg nightly rate", format_money(stats.avg_nightly_rate));
        Ok(())
    }
}
