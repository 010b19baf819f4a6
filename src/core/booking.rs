//! Booking charges and the income transaction each booking pairs with.

use super::error::{EngineError, Result};
use super::ledger::{Transaction, TransactionType, RENTAL_INCOME};
use super::money::{self, ensure_non_negative, round_currency, stay_nights};
use super::property::Property;
use chrono::NaiveDateTime;
use rentax_derive::FieldDocs;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn display(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

/// A guest stay at a property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, FieldDocs)]
pub struct Booking {
    /// Unique booking identifier
    pub id: i64,
    /// Property being booked
    pub property_id: i64,
    /// Guest name
    pub guest_name: String,
    /// Check-in date or datetime (YYYY-MM-DD[THH:MM:SS])
    #[serde(deserialize_with = "money::deserialize_date_time")]
    #[schemars(with = "String")]
    pub check_in_date: NaiveDateTime,
    /// Check-out date or datetime, strictly after check-in
    #[serde(deserialize_with = "money::deserialize_date_time")]
    #[schemars(with = "String")]
    pub check_out_date: NaiveDateTime,
    /// Charge per night
    #[schemars(with = "f64")]
    pub nightly_rate: Decimal,
    /// Nights times nightly rate
    #[schemars(with = "f64")]
    pub total_amount: Decimal,
    /// pending, confirmed, completed or cancelled
    #[serde(default)]
    pub status: BookingStatus,
    /// Free-form notes
    #[serde(default)]
    pub notes: Option<String>,
}

/// Input for a new booking; the total is always derived.
#[derive(Debug, Clone)]
pub struct BookingDraft {
    pub id: i64,
    pub property_id: i64,
    pub guest_name: String,
    pub check_in_date: NaiveDateTime,
    pub check_out_date: NaiveDateTime,
    pub nightly_rate: Decimal,
    pub notes: Option<String>,
}

/// Editable booking fields. Property and id never change.
#[derive(Debug, Clone)]
pub struct BookingChanges {
    pub guest_name: String,
    pub check_in_date: NaiveDateTime,
    pub check_out_date: NaiveDateTime,
    pub nightly_rate: Decimal,
    pub status: BookingStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BookingCharge {
    pub nights: i64,
    pub total_amount: Decimal,
}

/// A booking together with its paired income transaction.
///
/// Both must be stored as one unit: if the transaction cannot be written the booking has
/// to be removed again.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingEntry {
    pub booking: Booking,
    pub transaction: Transaction,
}

/// What happens to the paired income transaction when a booking is edited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PairedTransactionPolicy {
    /// Keep the historical transaction as recorded at booking time
    #[default]
    Preserve,
    /// Regenerate amount, date and description from the updated booking
    Resync,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookingUpdate {
    pub booking: Booking,
    /// The regenerated transaction, only under [`PairedTransactionPolicy::Resync`]
    pub transaction: Option<Transaction>,
}

/// Compute nights and total for a stay.
pub fn compute_booking_charge(
    check_in: NaiveDateTime,
    check_out: NaiveDateTime,
    nightly_rate: Decimal,
) -> Result<BookingCharge> {
    ensure_non_negative("nightly_rate", nightly_rate)?;
    let nights = stay_nights(check_in, check_out)?;
    let total = money::checked_mul(Decimal::from(nights), nightly_rate, "booking total")?;
    Ok(BookingCharge {
        nights,
        total_amount: round_currency(total),
    })
}

/// Create a booking and the income transaction it pairs with.
///
/// `transaction_id` is the identifier the caller will store the paired transaction under.
pub fn create_booking(
    properties: &[Property],
    draft: BookingDraft,
    transaction_id: i64,
) -> Result<BookingEntry> {
    if !properties.iter().any(|p| p.id == draft.property_id) {
        return Err(EngineError::UnknownProperty(draft.property_id));
    }
    let charge = compute_booking_charge(
        draft.check_in_date,
        draft.check_out_date,
        draft.nightly_rate,
    )?;

    let booking = Booking {
        id: draft.id,
        property_id: draft.property_id,
        guest_name: draft.guest_name,
        check_in_date: draft.check_in_date,
        check_out_date: draft.check_out_date,
        nightly_rate: draft.nightly_rate,
        total_amount: charge.total_amount,
        status: BookingStatus::Pending,
        notes: draft.notes,
    };
    let transaction = paired_transaction(transaction_id, &booking, charge.nights);
    log::debug!(
        "Booking {} for property {}: {} nights, total {}",
        booking.id,
        booking.property_id,
        charge.nights,
        charge.total_amount
    );

    Ok(BookingEntry {
        booking,
        transaction,
    })
}

/// Apply changes to a booking, recomputing its total.
///
/// Under [`PairedTransactionPolicy::Resync`] `paired` must be the transaction created with
/// the booking; it is returned with amount, date and description regenerated.
pub fn update_booking(
    booking: &Booking,
    changes: BookingChanges,
    paired: Option<&Transaction>,
    policy: PairedTransactionPolicy,
) -> Result<BookingUpdate> {
    let charge = compute_booking_charge(
        changes.check_in_date,
        changes.check_out_date,
        changes.nightly_rate,
    )?;

    let updated = Booking {
        guest_name: changes.guest_name,
        check_in_date: changes.check_in_date,
        check_out_date: changes.check_out_date,
        nightly_rate: changes.nightly_rate,
        total_amount: charge.total_amount,
        status: changes.status,
        notes: changes.notes,
        ..booking.clone()
    };

    let transaction = match policy {
        PairedTransactionPolicy::Preserve => None,
        PairedTransactionPolicy::Resync => {
            let paired = paired.ok_or(EngineError::MissingPairedTransaction(booking.id))?;
            if paired.booking_id != Some(booking.id) {
                return Err(EngineError::UnpairedTransaction {
                    transaction: paired.id,
                    booking: booking.id,
                });
            }
            let regenerated = paired_transaction(paired.id, &updated, charge.nights);
            Some(Transaction {
                category: paired.category.clone(),
                ..regenerated
            })
        }
    };

    Ok(BookingUpdate {
        booking: updated,
        transaction,
    })
}

fn paired_transaction(id: i64, booking: &Booking, nights: i64) -> Transaction {
    let unit = if nights == 1 { "night" } else { "nights" };
    Transaction {
        id,
        property_id: booking.property_id,
        booking_id: Some(booking.id),
        transaction_type: TransactionType::Income,
        category: RENTAL_INCOME.to_string(),
        amount: booking.total_amount,
        description: format!(
            "Rental income for {} ({} {})",
            booking.guest_name, nights, unit
        ),
        date: booking.check_in_date.date(),
    }
}

/// Summary counts across a set of bookings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingStats {
    pub total_bookings: usize,
    pub total_revenue: Decimal,
    pub avg_nightly_rate: Decimal,
    pub confirmed_bookings: usize,
    pub completed_bookings: usize,
}

pub fn booking_stats(bookings: &[Booking]) -> Result<BookingStats> {
    let total_revenue = money::checked_sum(bookings.iter().map(|b| b.total_amount), "revenue")?;
    let rate_sum = money::checked_sum(bookings.iter().map(|b| b.nightly_rate), "nightly rates")?;
    let avg_nightly_rate = if bookings.is_empty() {
        Decimal::ZERO
    } else {
        round_currency(rate_sum / Decimal::from(bookings.len()))
    };
    let count = |status| bookings.iter().filter(|b| b.status == status).count();

    Ok(BookingStats {
        total_bookings: bookings.len(),
        total_revenue,
        avg_nightly_rate,
        confirmed_bookings: count(BookingStatus::Confirmed),
        completed_bookings: count(BookingStatus::Completed),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::money::parse_date_time;
    use crate::core::property::tests::property;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn dt(s: &str) -> NaiveDateTime {
        parse_date_time(s).unwrap()
    }

    fn draft(check_in: &str, check_out: &str, rate: Decimal) -> BookingDraft {
        BookingDraft {
            id: 10,
            property_id: 1,
            guest_name: "Ada".to_string(),
            check_in_date: dt(check_in),
            check_out_date: dt(check_out),
            nightly_rate: rate,
            notes: None,
        }
    }

    fn changes_from(booking: &Booking) -> BookingChanges {
        BookingChanges {
            guest_name: booking.guest_name.clone(),
            check_in_date: booking.check_in_date,
            check_out_date: booking.check_out_date,
            nightly_rate: booking.nightly_rate,
            status: booking.status,
            notes: booking.notes.clone(),
        }
    }

    #[test]
    fn charge_is_nights_times_rate() {
        let charge =
            compute_booking_charge(dt("2024-07-01"), dt("2024-07-05"), dec!(125.50)).unwrap();
        assert_eq!(charge.nights, 4);
        assert_eq!(charge.total_amount, dec!(502.00));
    }

    #[test]
    fn charge_rounds_partial_days_up() {
        let charge = compute_booking_charge(
            dt("2024-07-01T15:00:00"),
            dt("2024-07-03T03:00:00"),
            dec!(100),
        )
        .unwrap();
        // 36 hours
        assert_eq!(charge.nights, 2);
        assert_eq!(charge.total_amount, dec!(200));
    }

    #[test]
    fn charge_is_exact_to_the_cent() {
        let charge =
            compute_booking_charge(dt("2024-07-01"), dt("2024-07-04"), dec!(33.335)).unwrap();
        assert_eq!(charge.total_amount, dec!(100.01));
    }

    #[test]
    fn zero_rate_is_free() {
        let charge = compute_booking_charge(dt("2024-07-01"), dt("2024-07-03"), dec!(0)).unwrap();
        assert_eq!(charge.total_amount, dec!(0));
    }

    #[test]
    fn charge_rejects_bad_input() {
        assert!(matches!(
            compute_booking_charge(dt("2024-07-03"), dt("2024-07-01"), dec!(10)),
            Err(EngineError::InvalidStay { .. })
        ));
        assert_eq!(
            compute_booking_charge(dt("2024-07-01"), dt("2024-07-03"), dec!(-1)),
            Err(EngineError::NegativeAmount {
                field: "nightly_rate",
                value: dec!(-1)
            })
        );
    }

    #[test]
    fn create_pairs_income_transaction() {
        let properties = vec![property(1, dec!(200000))];
        let entry = create_booking(
            &properties,
            draft("2024-07-01", "2024-07-04", dec!(150)),
            99,
        )
        .unwrap();

        assert_eq!(entry.booking.total_amount, dec!(450));
        assert_eq!(entry.booking.status, BookingStatus::Pending);

        let tx = &entry.transaction;
        assert_eq!(tx.id, 99);
        assert_eq!(tx.property_id, 1);
        assert_eq!(tx.booking_id, Some(10));
        assert_eq!(tx.transaction_type, TransactionType::Income);
        assert_eq!(tx.category, "rental_income");
        assert_eq!(tx.amount, dec!(450));
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
        assert_eq!(tx.description, "Rental income for Ada (3 nights)");
    }

    #[test]
    fn single_night_description() {
        let properties = vec![property(1, dec!(200000))];
        let entry =
            create_booking(&properties, draft("2024-07-01", "2024-07-02", dec!(80)), 1).unwrap();
        assert_eq!(entry.transaction.description, "Rental income for Ada (1 night)");
    }

    #[test]
    fn create_requires_known_property() {
        let properties = vec![property(2, dec!(200000))];
        assert_eq!(
            create_booking(&properties, draft("2024-07-01", "2024-07-02", dec!(80)), 1),
            Err(EngineError::UnknownProperty(1))
        );
    }

    #[test]
    fn update_preserves_transaction_by_default() {
        let properties = vec![property(1, dec!(200000))];
        let entry =
            create_booking(&properties, draft("2024-07-01", "2024-07-04", dec!(100)), 5).unwrap();
        let mut changes = changes_from(&entry.booking);
        changes.check_out_date = dt("2024-07-06");
        changes.status = BookingStatus::Confirmed;

        let update = update_booking(
            &entry.booking,
            changes,
            Some(&entry.transaction),
            PairedTransactionPolicy::default(),
        )
        .unwrap();

        assert_eq!(update.booking.total_amount, dec!(500));
        assert_eq!(update.booking.status, BookingStatus::Confirmed);
        assert_eq!(update.booking.id, entry.booking.id);
        assert!(update.transaction.is_none());
    }

    #[test]
    fn update_resyncs_transaction_when_asked() {
        let properties = vec![property(1, dec!(200000))];
        let entry =
            create_booking(&properties, draft("2024-07-01", "2024-07-04", dec!(100)), 5).unwrap();
        let mut changes = changes_from(&entry.booking);
        changes.check_in_date = dt("2024-07-02");
        changes.check_out_date = dt("2024-07-07");
        changes.nightly_rate = dec!(90);

        let update = update_booking(
            &entry.booking,
            changes,
            Some(&entry.transaction),
            PairedTransactionPolicy::Resync,
        )
        .unwrap();

        let tx = update.transaction.unwrap();
        assert_eq!(tx.id, 5);
        assert_eq!(tx.amount, dec!(450));
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 7, 2).unwrap());
        assert_eq!(tx.description, "Rental income for Ada (5 nights)");
    }

    #[test]
    fn resync_requires_the_paired_transaction() {
        let properties = vec![property(1, dec!(200000))];
        let entry =
            create_booking(&properties, draft("2024-07-01", "2024-07-04", dec!(100)), 5).unwrap();
        let changes = changes_from(&entry.booking);

        assert_eq!(
            update_booking(
                &entry.booking,
                changes.clone(),
                None,
                PairedTransactionPolicy::Resync
            ),
            Err(EngineError::MissingPairedTransaction(10))
        );

        let mut other = entry.transaction.clone();
        other.booking_id = Some(11);
        assert_eq!(
            update_booking(
                &entry.booking,
                changes,
                Some(&other),
                PairedTransactionPolicy::Resync
            ),
            Err(EngineError::UnpairedTransaction {
                transaction: 5,
                booking: 10
            })
        );
    }

    #[test]
    fn stats_count_statuses() {
        let properties = vec![property(1, dec!(200000))];
        let mut bookings: Vec<Booking> = [("2024-07-01", dec!(100)), ("2024-08-01", dec!(151))]
            .iter()
            .map(|(d, rate)| {
                let mut draft = draft(d, "2024-09-01", *rate);
                draft.check_out_date = dt(d) + chrono::Duration::days(2);
                create_booking(&properties, draft, 1).unwrap().booking
            })
            .collect();
        bookings[0].status = BookingStatus::Confirmed;
        bookings[1].status = BookingStatus::Completed;

        let stats = booking_stats(&bookings).unwrap();
        assert_eq!(stats.total_bookings, 2);
        assert_eq!(stats.total_revenue, dec!(502));
        assert_eq!(stats.avg_nightly_rate, dec!(125.50));
        assert_eq!(stats.confirmed_bookings, 1);
        assert_eq!(stats.completed_bookings, 1);
    }

    #[test]
    fn stats_of_nothing_are_zero() {
        let stats = booking_stats(&[]).unwrap();
        assert_eq!(stats.total_bookings, 0);
        assert_eq!(stats.total_revenue, Decimal::ZERO);
        assert_eq!(stats.avg_nightly_rate, Decimal::ZERO);
    }
}
