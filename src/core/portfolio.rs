//! Portfolio-wide value and carrying-cost totals.

use super::error::Result;
use super::money::{checked_add, checked_mul, checked_sum, round_currency};
use super::property::Property;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortfolioOverview {
    pub total_properties: usize,
    pub total_purchase_value: Decimal,
    pub total_portfolio_value: Decimal,
    pub total_appreciation: Decimal,
    /// Appreciation over purchase value, as a percentage; `None` with no purchase value
    pub appreciation_percentage: Option<Decimal>,
    pub total_monthly_rent: Decimal,
    /// Taxes plus insurance plus twelve months of HOA fees
    pub annual_carrying_costs: Decimal,
}

pub fn portfolio_overview(properties: &[Property]) -> Result<PortfolioOverview> {
    for property in properties {
        property.validate()?;
    }

    let total_purchase_value =
        checked_sum(properties.iter().map(|p| p.purchase_price), "purchase value")?;
    let total_portfolio_value =
        checked_sum(properties.iter().map(|p| p.current_value), "portfolio value")?;
    let total_monthly_rent = checked_sum(properties.iter().map(|p| p.monthly_rent), "rent")?;
    let annual_carrying_costs = properties.iter().try_fold(Decimal::ZERO, |acc, p| {
        let hoa = checked_mul(p.hoa_fees, dec!(12), "hoa fees")?;
        let costs = checked_add(p.annual_taxes, p.annual_insurance, "carrying costs")?;
        checked_add(acc, checked_add(costs, hoa, "carrying costs")?, "carrying costs")
    })?;

    let total_appreciation = total_portfolio_value - total_purchase_value;
    let appreciation_percentage = if total_purchase_value.is_zero() {
        None
    } else {
        let scaled = checked_mul(total_appreciation, dec!(100), "appreciation")?;
        Some(round_currency(scaled / total_purchase_value))
    };

    Ok(PortfolioOverview {
        total_properties: properties.len(),
        total_purchase_value,
        total_portfolio_value,
        total_appreciation,
        appreciation_percentage,
        total_monthly_rent,
        annual_carrying_costs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::property::tests::property;

    #[test]
    fn empty_portfolio() {
        let overview = portfolio_overview(&[]).unwrap();
        assert_eq!(overview.total_properties, 0);
        assert_eq!(overview.total_appreciation, dec!(0));
        assert_eq!(overview.appreciation_percentage, None);
    }

    #[test]
    fn totals_and_appreciation() {
        let mut a = property(1, dec!(200000));
        a.current_value = dec!(250000);
        a.monthly_rent = dec!(1800);
        a.annual_taxes = dec!(3000);
        a.annual_insurance = dec!(1200);
        let mut b = property(2, dec!(100000));
        b.current_value = dec!(95000);
        b.monthly_rent = dec!(950);
        b.hoa_fees = dec!(150);

        let overview = portfolio_overview(&[a, b]).unwrap();
        assert_eq!(overview.total_properties, 2);
        assert_eq!(overview.total_purchase_value, dec!(300000));
        assert_eq!(overview.total_portfolio_value, dec!(345000));
        assert_eq!(overview.total_appreciation, dec!(45000));
        assert_eq!(overview.appreciation_percentage, Some(dec!(15.00)));
        assert_eq!(overview.total_monthly_rent, dec!(2750));
        assert_eq!(overview.annual_carrying_costs, dec!(6000));
    }

    #[test]
    fn depreciating_portfolio_has_negative_appreciation() {
        let mut a = property(1, dec!(300000));
        a.current_value = dec!(200000);
        let overview = portfolio_overview(&[a]).unwrap();
        assert_eq!(overview.total_appreciation, dec!(-100000));
        assert_eq!(overview.appreciation_percentage, Some(dec!(-33.33)));
    }

    #[test]
    fn zero_purchase_value_has_no_percentage() {
        let mut a = property(1, dec!(0));
        a.current_value = dec!(5000);
        let overview = portfolio_overview(&[a]).unwrap();
        assert_eq!(overview.total_appreciation, dec!(5000));
        assert_eq!(overview.appreciation_percentage, None);
    }
}
