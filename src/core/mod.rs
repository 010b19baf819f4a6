pub mod booking;
pub mod depreciation;
pub mod error;
pub mod ledger;
pub mod money;
pub mod portfolio;
pub mod property;
pub mod report;
pub mod schema;
pub mod snapshot;
pub mod tax_year;

// Flat public surface for domain types and functions.
pub use booking::{
    booking_stats, compute_booking_charge, create_booking, update_booking, Booking,
    BookingChanges, BookingCharge, BookingDraft, BookingEntry, BookingStats, BookingStatus,
    BookingUpdate, PairedTransactionPolicy,
};
pub use depreciation::{
    compute_depreciation, yearly_totals, DepreciationOutput, DepreciationRecord,
    DepreciationSchedule, YearlyDepreciation,
};
pub use error::{EngineError, ErrorKind, Result};
pub use ledger::{
    aggregate_cash_flow, category_totals, monthly_series, property_performance,
    property_totals, validate_transactions, CashFlowSummary, CategoryTotal, LedgerFilter,
    MonthlyCashFlow, PropertyPerformance, PropertyTotals, Transaction, TransactionType,
    RENTAL_INCOME,
};
pub use portfolio::{portfolio_overview, PortfolioOverview};
pub use property::{Property, PropertyType};
pub use report::{
    build_tax_report, forms_needed, TaxForm, TaxReport, TaxReportRow, TaxReportTotals,
    FORM_RULES,
};
pub use schema::FieldDoc;
pub use snapshot::PortfolioSnapshot;
pub use tax_year::TaxYear;
