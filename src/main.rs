mod cmd;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "rentax")]
#[command(about = "Rental portfolio cash flow, depreciation and tax reporting")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute nights and total charge for a stay
    Charge(cmd::charge::ChargeCommand),
    /// Monthly, per-property and per-category cash flow for a year
    Cashflow(cmd::cashflow::CashFlowCommand),
    /// All-time net cash flow per property, best first
    Performance(cmd::performance::PerformanceCommand),
    /// Section 179, bonus and straight-line depreciation for a year
    Depreciation(cmd::depreciation::DepreciationCommand),
    /// Annual tax report with required forms
    TaxReport(cmd::tax_report::TaxReportCommand),
    /// Portfolio value, appreciation and carrying costs
    Overview(cmd::overview::OverviewCommand),
    /// Bookings with nights, totals and summary statistics
    Bookings(cmd::bookings::BookingsCommand),
    /// Print the expected input format
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Charge(charge) => charge.exec(),
        Command::Cashflow(cashflow) => cashflow.exec(),
        Command::Performance(performance) => performance.exec(),
        Command::Depreciation(depreciation) => depreciation.exec(),
        Command::TaxReport(tax_report) => tax_report.exec(),
        Command::Overview(overview) => overview.exec(),
        Command::Bookings(bookings) => bookings.exec(),
        Command::Schema(schema) => schema.exec(),
    }
}
