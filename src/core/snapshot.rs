//! JSON input describing a whole portfolio.

use super::booking::{compute_booking_charge, Booking};
use super::depreciation::{DepreciationRecord, DepreciationSchedule};
use super::error::{EngineError, Result};
use super::ledger::{self, Transaction};
use super::property::Property;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Read;

/// Properties, bookings, ledger transactions and depreciation records as one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct PortfolioSnapshot {
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub bookings: Vec<Booking>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub depreciation_records: Vec<DepreciationRecord>,
}

impl PortfolioSnapshot {
    /// Parse a snapshot; call [`PortfolioSnapshot::validate`] before aggregating it.
    pub fn read_json<R: Read>(reader: R) -> anyhow::Result<Self> {
        let snapshot: PortfolioSnapshot = serde_json::from_reader(reader)?;
        log::debug!(
            "Read snapshot: {} properties, {} bookings, {} transactions, {} depreciation records",
            snapshot.properties.len(),
            snapshot.bookings.len(),
            snapshot.transactions.len(),
            snapshot.depreciation_records.len()
        );
        Ok(snapshot)
    }

    pub fn validate(&self) -> Result<()> {
        let mut property_ids = HashSet::new();
        for property in &self.properties {
            property.validate()?;
            if !property_ids.insert(property.id) {
                return Err(EngineError::DuplicatePropertyId(property.id));
            }
            if property.placed_in_service_date.is_none() {
                log::warn!(
                    "Property {} ({}) has no placed-in-service date and will not depreciate",
                    property.id,
                    property.address
                );
            }
        }
        let known = |id: i64| -> Result<()> {
            if property_ids.contains(&id) {
                Ok(())
            } else {
                Err(EngineError::UnknownProperty(id))
            }
        };

        let mut booking_ids = HashSet::new();
        for booking in &self.bookings {
            known(booking.property_id)?;
            let charge = compute_booking_charge(
                booking.check_in_date,
                booking.check_out_date,
                booking.nightly_rate,
            )?;
            if charge.total_amount != booking.total_amount {
                return Err(EngineError::BookingTotalMismatch {
                    booking: booking.id,
                    stored: booking.total_amount,
                    expected: charge.total_amount,
                });
            }
            booking_ids.insert(booking.id);
        }

        ledger::validate_transactions(&self.transactions)?;
        for tx in &self.transactions {
            known(tx.property_id)?;
            if let Some(booking) = tx.booking_id.filter(|b| !booking_ids.contains(b)) {
                log::warn!("Transaction {} refers to missing booking {}", tx.id, booking);
            }
        }

        for record in &self.depreciation_records {
            known(record.property_id)?;
        }
        DepreciationSchedule::from_records(self.depreciation_records.iter().cloned())?;
        Ok(())
    }

    pub fn property(&self, id: i64) -> Option<&Property> {
        self.properties.iter().find(|p| p.id == id)
    }

    pub fn schedule(&self) -> Result<DepreciationSchedule> {
        DepreciationSchedule::from_records(self.depreciation_records.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;
    use rust_decimal_macros::dec;

    const SNAPSHOT: &str = r#"{
        "properties": [
            {"id": 1, "address": "12 Oak Ave", "property_type": "single_family",
             "purchase_price": "300000", "current_value": "340000",
             "placed_in_service_date": "2020-03-01"},
            {"id": 2, "address": "8 Pine Ct", "property_type": "condo",
             "purchase_price": "150000", "current_value": "150000"}
        ],
        "bookings": [
            {"id": 7, "property_id": 1, "guest_name": "A. Guest",
             "check_in_date": "2024-03-01", "check_out_date": "2024-03-04",
             "nightly_rate": "120", "total_amount": "360", "status": "confirmed"}
        ],
        "transactions": [
            {"id": 1, "property_id": 1, "booking_id": 7, "type": "income",
             "category": "rental_income", "amount": "360", "date": "2024-03-01"},
            {"id": 2, "property_id": 2, "type": "expense", "category": "repairs",
             "amount": "85.50", "date": "2024-05-10"}
        ],
        "depreciation_records": [
            {"property_id": 1, "year": 2024, "straight_line": "10909.09"}
        ]
    }"#;

    fn snapshot() -> PortfolioSnapshot {
        PortfolioSnapshot::read_json(SNAPSHOT.as_bytes()).unwrap()
    }

    #[test]
    fn reads_and_validates() {
        let snapshot = snapshot();
        assert_eq!(snapshot.properties.len(), 2);
        assert_eq!(snapshot.transactions[1].amount, dec!(85.50));
        assert_eq!(snapshot.depreciation_records[0].bonus_depreciation, dec!(0));
        assert_eq!(snapshot.property(2).map(|p| p.address.as_str()), Some("8 Pine Ct"));
        snapshot.validate().unwrap();
        assert_eq!(snapshot.schedule().unwrap().len(), 1);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let snapshot = PortfolioSnapshot::read_json("{}".as_bytes()).unwrap();
        assert!(snapshot.properties.is_empty());
        snapshot.validate().unwrap();
    }

    #[test]
    fn rejects_reference_to_unknown_property() {
        let mut snapshot = snapshot();
        snapshot.transactions[1].property_id = 3;
        assert_eq!(snapshot.validate(), Err(EngineError::UnknownProperty(3)));

        let mut snapshot = self::snapshot();
        snapshot.bookings[0].property_id = 9;
        assert_eq!(snapshot.validate(), Err(EngineError::UnknownProperty(9)));
    }

    #[test]
    fn tolerates_transaction_for_deleted_booking() {
        let mut snapshot = snapshot();
        snapshot.bookings.clear();
        snapshot.validate().unwrap();
    }

    #[test]
    fn rejects_negative_amount_and_duplicates() {
        let mut snapshot = snapshot();
        snapshot.transactions[0].amount = dec!(-1);
        assert_eq!(snapshot.validate().unwrap_err().kind(), ErrorKind::Validation);

        let mut snapshot = self::snapshot();
        let duplicate = snapshot.depreciation_records[0].clone();
        snapshot.depreciation_records.push(duplicate);
        assert_eq!(
            snapshot.validate(),
            Err(EngineError::DuplicateDepreciationRecord {
                property: 1,
                year: 2024
            })
        );

        let mut snapshot = self::snapshot();
        let duplicate = snapshot.properties[0].clone();
        snapshot.properties.push(duplicate);
        assert_eq!(snapshot.validate(), Err(EngineError::DuplicatePropertyId(1)));
    }

    #[test]
    fn rejects_stale_booking_total() {
        let mut snapshot = snapshot();
        snapshot.bookings[0].total_amount = dec!(99999);
        let err = snapshot.validate().unwrap_err();
        assert_eq!(
            err,
            EngineError::BookingTotalMismatch {
                booking: 7,
                stored: dec!(99999),
                expected: dec!(360)
            }
        );
        assert_eq!(err.kind(), ErrorKind::Integrity);

        // Same value at a different scale still matches
        let mut snapshot = self::snapshot();
        snapshot.bookings[0].total_amount = dec!(360.00);
        snapshot.validate().unwrap();
    }

    #[test]
    fn rejects_inverted_stay() {
        let mut snapshot = snapshot();
        let booking = &mut snapshot.bookings[0];
        std::mem::swap(&mut booking.check_in_date, &mut booking.check_out_date);
        assert_eq!(snapshot.validate().unwrap_err().kind(), ErrorKind::Validation);
    }
}
