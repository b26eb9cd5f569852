use serde::Serialize;

/// Withholding rate expressed in thousandths (3.3%).
pub const WITHHOLDING_PER_MILLE: u64 = 33;

/// Gross amount split into withheld tax and the net payout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaxBreakdown {
    pub amount: u64,
    pub tax_amount: u64,
    pub final_amount: u64,
}

impl TaxBreakdown {
    /// `tax = floor(amount * 0.033)` in integer arithmetic; `tax + final == amount`.
    pub fn for_amount(amount: u64) -> Self {
        let tax = u128::from(amount) * u128::from(WITHHOLDING_PER_MILLE) / 1_000;
        // tax <= amount, so it always fits back into u64
        let tax_amount = u64::try_from(tax).unwrap_or(amount);
        Self {
            amount,
            tax_amount,
            final_amount: amount - tax_amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hundred_thousand_points_withhold_3300() {
        let breakdown = TaxBreakdown::for_amount(100_000);
        assert_eq!(breakdown.tax_amount, 3_300);
        assert_eq!(breakdown.final_amount, 96_700);
    }

    #[test]
    fn fractional_tax_is_floored() {
        let breakdown = TaxBreakdown::for_amount(1_000);
        assert_eq!(breakdown.tax_amount, 33);
        assert_eq!(breakdown.final_amount, 967);

        let breakdown = TaxBreakdown::for_amount(1_234);
        // 1234 * 0.033 = 40.722
        assert_eq!(breakdown.tax_amount, 40);
        assert_eq!(breakdown.final_amount, 1_194);
    }

    #[test]
    fn parts_always_sum_to_the_gross_amount() {
        for amount in [0, 1, 29, 30, 31, 999, 1_001, 12_345, 987_654_321, u64::MAX] {
            let breakdown = TaxBreakdown::for_amount(amount);
            assert_eq!(breakdown.tax_amount + breakdown.final_amount, amount);
            assert_eq!(
                u128::from(breakdown.tax_amount),
                u128::from(amount) * 33 / 1_000
            );
        }
    }
}
