//! Rental portfolio bookkeeping: booking charges, cash-flow aggregation, MACRS
//! depreciation and the annual tax report.

pub mod core;
