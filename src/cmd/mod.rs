pub mod bookings;
pub mod cashflow;
pub mod charge;
pub mod depreciation;
pub mod overview;
pub mod performance;
pub mod schema;
pub mod tax_report;

use anyhow::Context;
use rentax::core::money::round_currency;
use rentax::core::PortfolioSnapshot;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Read and validate a portfolio snapshot (JSON file, or stdin with "-")
pub fn read_snapshot(path: &Path) -> anyhow::Result<PortfolioSnapshot> {
    let snapshot = if path.as_os_str() == "-" {
        read_from_stdin()?
    } else {
        read_from_file(path)?
    };
    snapshot.validate()?;
    Ok(snapshot)
}

fn read_from_file(path: &Path) -> anyhow::Result<PortfolioSnapshot> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    PortfolioSnapshot::read_json(BufReader::new(file))
        .with_context(|| format!("failed to parse {}", path.display()))
}

fn read_from_stdin() -> anyhow::Result<PortfolioSnapshot> {
    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin.lock());

    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;

    if buffer.is_empty() {
        anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
    }

    PortfolioSnapshot::read_json(io::Cursor::new(buffer))
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn write_csv<T: Serialize>(rows: &[T]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(io::stdout());
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Currency amount rounded half-up to cents, e.g. `$1234.50`
pub fn format_money(amount: Decimal) -> String {
    format!("${:.2}", round_currency(amount))
}
