use chrono::NaiveDateTime;
use rust_decimal::Decimal;

/// Broad classification of an [`EngineError`], for callers deciding how to surface it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or out-of-range input.
    Validation,
    /// The input violates a cross-record invariant.
    Integrity,
    /// Arithmetic that should not fail did (e.g. decimal overflow).
    Computation,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("year {0} is outside the supported range 2000-2100")]
    YearOutOfRange(i32),
    #[error("business use percentage {0} is outside 0-100")]
    BusinessUseOutOfRange(Decimal),
    #[error("{field} must not be negative: {value}")]
    NegativeAmount { field: &'static str, value: Decimal },
    #[error("check-out {check_out} must be after check-in {check_in}")]
    InvalidStay {
        check_in: NaiveDateTime,
        check_out: NaiveDateTime,
    },
    #[error("invalid date: {0}")]
    InvalidDate(String),
    #[error("depreciation override for property {record_property} year {record_year} does not apply to property {property} year {year}")]
    OverrideMismatch {
        property: i64,
        year: i32,
        record_property: i64,
        record_year: i32,
    },
    #[error("unknown property: {0}")]
    UnknownProperty(i64),
    #[error("duplicate property id: {0}")]
    DuplicatePropertyId(i64),
    #[error("duplicate depreciation record for property {property} year {year}")]
    DuplicateDepreciationRecord { property: i64, year: i32 },
    #[error("transaction {transaction} is not paired with booking {booking}")]
    UnpairedTransaction { transaction: i64, booking: i64 },
    #[error("booking {booking} total {stored} does not match {expected} from nights and rate")]
    BookingTotalMismatch {
        booking: i64,
        stored: Decimal,
        expected: Decimal,
    },
    #[error("booking {0} has no paired transaction")]
    MissingPairedTransaction(i64),
    #[error("arithmetic overflow computing {0}")]
    Overflow(&'static str),
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::YearOutOfRange(_)
            | EngineError::BusinessUseOutOfRange(_)
            | EngineError::NegativeAmount { .. }
            | EngineError::InvalidStay { .. }
            | EngineError::InvalidDate(_)
            | EngineError::OverrideMismatch { .. } => ErrorKind::Validation,
            EngineError::UnknownProperty(_)
            | EngineError::DuplicatePropertyId(_)
            | EngineError::DuplicateDepreciationRecord { .. }
            | EngineError::UnpairedTransaction { .. }
            | EngineError::BookingTotalMismatch { .. }
            | EngineError::MissingPairedTransaction(_) => ErrorKind::Integrity,
            EngineError::Overflow(_) => ErrorKind::Computation,
        }
    }
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn kinds_are_classified() {
        assert_eq!(EngineError::YearOutOfRange(1999).kind(), ErrorKind::Validation);
        assert_eq!(
            EngineError::BusinessUseOutOfRange(dec!(101)).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            EngineError::DuplicateDepreciationRecord {
                property: 1,
                year: 2024
            }
            .kind(),
            ErrorKind::Integrity
        );
        assert_eq!(EngineError::UnknownProperty(7).kind(), ErrorKind::Integrity);
        assert_eq!(
            EngineError::Overflow("total").kind(),
            ErrorKind::Computation
        );
    }

    #[test]
    fn messages_name_the_offending_values() {
        let err = EngineError::DuplicateDepreciationRecord {
            property: 3,
            year: 2024,
        };
        assert_eq!(
            err.to_string(),
            "duplicate depreciation record for property 3 year 2024"
        );
    }
}
