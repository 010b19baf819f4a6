use super::error::{EngineError, Result};
use super::money::{self, ensure_non_negative};
use chrono::NaiveDate;
use rentax_derive::FieldDocs;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Kind of real estate, which decides its recovery period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    #[default]
    SingleFamily,
    MultiFamily,
    Condo,
    Townhouse,
    Commercial,
    Land,
}

impl PropertyType {
    /// MACRS straight-line recovery period in years; land is not depreciable.
    pub fn recovery_years(self) -> Option<Decimal> {
        match self {
            PropertyType::SingleFamily
            | PropertyType::MultiFamily
            | PropertyType::Condo
            | PropertyType::Townhouse => Some(dec!(27.5)),
            PropertyType::Commercial => Some(dec!(39)),
            PropertyType::Land => None,
        }
    }

    pub fn display(self) -> &'static str {
        match self {
            PropertyType::SingleFamily => "single_family",
            PropertyType::MultiFamily => "multi_family",
            PropertyType::Condo => "condo",
            PropertyType::Townhouse => "townhouse",
            PropertyType::Commercial => "commercial",
            PropertyType::Land => "land",
        }
    }
}

/// A rental property in the portfolio
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, FieldDocs)]
pub struct Property {
    /// Unique property identifier
    pub id: i64,
    /// Street address
    pub address: String,
    /// single_family, multi_family, condo, townhouse, commercial or land
    #[serde(default)]
    pub property_type: PropertyType,
    /// Cost basis at acquisition
    #[schemars(with = "f64")]
    pub purchase_price: Decimal,
    /// Current market value
    #[schemars(with = "f64")]
    pub current_value: Decimal,
    /// Expected monthly rent
    #[serde(default)]
    #[schemars(with = "f64")]
    pub monthly_rent: Decimal,
    /// Annual property taxes
    #[serde(default)]
    #[schemars(with = "f64")]
    pub annual_taxes: Decimal,
    /// Annual insurance premium
    #[serde(default)]
    #[schemars(with = "f64")]
    pub annual_insurance: Decimal,
    /// Monthly HOA fees
    #[serde(default)]
    #[schemars(with = "f64")]
    pub hoa_fees: Decimal,
    /// Date the property became available for rent (YYYY-MM-DD)
    #[serde(default, deserialize_with = "money::deserialize_opt_date")]
    pub placed_in_service_date: Option<NaiveDate>,
    /// Share of use attributable to the rental business, 0-100
    #[serde(default = "full_business_use")]
    #[schemars(with = "f64")]
    pub business_use_percentage: Decimal,
    /// Amount elected for Section 179 expensing in the placed-in-service year
    #[serde(default)]
    #[schemars(with = "f64")]
    pub section_179_election: Decimal,
    /// Claim bonus depreciation in the placed-in-service year
    #[serde(default)]
    pub elect_bonus: bool,
}

fn full_business_use() -> Decimal {
    dec!(100)
}

impl Property {
    pub fn validate(&self) -> Result<()> {
        if self.business_use_percentage < Decimal::ZERO
            || self.business_use_percentage > dec!(100)
        {
            return Err(EngineError::BusinessUseOutOfRange(
                self.business_use_percentage,
            ));
        }
        ensure_non_negative("purchase_price", self.purchase_price)?;
        ensure_non_negative("current_value", self.current_value)?;
        ensure_non_negative("monthly_rent", self.monthly_rent)?;
        ensure_non_negative("annual_taxes", self.annual_taxes)?;
        ensure_non_negative("annual_insurance", self.annual_insurance)?;
        ensure_non_negative("hoa_fees", self.hoa_fees)?;
        ensure_non_negative("section_179_election", self.section_179_election)?;
        Ok(())
    }

    /// Cost basis eligible for deductions: purchase price scaled by business use.
    pub fn business_basis(&self) -> Result<Decimal> {
        let scaled = money::checked_mul(
            self.purchase_price,
            self.business_use_percentage,
            "business basis",
        )?;
        Ok(scaled / dec!(100))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn property(id: i64, purchase_price: Decimal) -> Property {
        Property {
            id,
            address: format!("{id} Main St"),
            property_type: PropertyType::SingleFamily,
            purchase_price,
            current_value: purchase_price,
            monthly_rent: Decimal::ZERO,
            annual_taxes: Decimal::ZERO,
            annual_insurance: Decimal::ZERO,
            hoa_fees: Decimal::ZERO,
            placed_in_service_date: None,
            business_use_percentage: dec!(100),
            section_179_election: Decimal::ZERO,
            elect_bonus: false,
        }
    }

    #[test]
    fn recovery_periods() {
        assert_eq!(PropertyType::Condo.recovery_years(), Some(dec!(27.5)));
        assert_eq!(PropertyType::Commercial.recovery_years(), Some(dec!(39)));
        assert_eq!(PropertyType::Land.recovery_years(), None);
    }

    #[test]
    fn business_basis_scales_purchase_price() {
        let mut p = property(1, dec!(300000));
        p.business_use_percentage = dec!(40);
        assert_eq!(p.business_basis().unwrap(), dec!(120000));
    }

    #[test]
    fn validate_rejects_out_of_range_business_use() {
        let mut p = property(1, dec!(1000));
        p.business_use_percentage = dec!(100.5);
        assert_eq!(
            p.validate(),
            Err(EngineError::BusinessUseOutOfRange(dec!(100.5)))
        );
        p.business_use_percentage = dec!(-1);
        assert!(p.validate().is_err());
    }

    #[test]
    fn validate_rejects_negative_money() {
        let mut p = property(1, dec!(1000));
        p.hoa_fees = dec!(-5);
        assert_eq!(
            p.validate(),
            Err(EngineError::NegativeAmount {
                field: "hoa_fees",
                value: dec!(-5)
            })
        );
    }

    #[test]
    fn deserializes_with_defaults() {
        let p: Property = serde_json::from_str(
            r#"{"id": 4, "address": "4 Elm", "purchase_price": "250000", "current_value": 275000,
                "placed_in_service_date": "2023-06-15"}"#,
        )
        .unwrap();
        assert_eq!(p.property_type, PropertyType::SingleFamily);
        assert_eq!(p.business_use_percentage, dec!(100));
        assert_eq!(p.purchase_price, dec!(250000));
        assert_eq!(
            p.placed_in_service_date,
            NaiveDate::from_ymd_opt(2023, 6, 15)
        );
        assert!(!p.elect_bonus);
    }

    #[test]
    fn field_docs_mark_defaults_optional() {
        let docs = Property::field_docs();
        let required: Vec<_> = docs.iter().filter(|f| f.required).map(|f| f.name).collect();
        assert_eq!(
            required,
            vec!["id", "address", "purchase_price", "current_value"]
        );
    }
}
