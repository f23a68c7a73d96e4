//! Pricing arithmetic for bookings.
//!
//! All amounts are whole IDR. Rounding uses half-away-from-zero so the
//! split matches what the mobile clients display.

use serde::Serialize;

/// Platform commission rate applied to the post-discount price.
pub const COMMISSION_RATE: f64 = 0.30;

/// Result of splitting a price into platform and provider shares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionSplit {
    pub admin_commission: i64,
    pub provider_payout: i64,
}

/// Full quote for a booking with an optional discount applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub original_price: i64,
    pub discount_percentage: u8,
    pub discount_amount: i64,
    pub discounted_price: i64,
    pub admin_commission: i64,
    pub provider_payout: i64,
}

fn round_half_up(value: f64) -> i64 {
    value.round() as i64
}

/// Splits `price` into the platform commission and the provider payout.
///
/// The two parts always sum to `price` exactly; any rounding remainder
/// lands in the payout.
pub fn commission_split(price: i64) -> CommissionSplit {
    let admin_commission = round_half_up(price as f64 * COMMISSION_RATE);
    CommissionSplit {
        admin_commission,
        provider_payout: price - admin_commission,
    }
}

/// Computes a full quote: discount first, then commission on the
/// discounted price.
pub fn discount_quote(original_price: i64, discount_percentage: u8) -> PriceQuote {
    let discount_amount =
        round_half_up(original_price as f64 * discount_percentage as f64 / 100.0);
    let discounted_price = original_price - discount_amount;
    let split = commission_split(discounted_price);
    PriceQuote {
        original_price,
        discount_percentage,
        discount_amount,
        discounted_price,
        admin_commission: split.admin_commission,
        provider_payout: split.provider_payout,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sums_to_price() {
        for price in [1i64, 99, 1_000, 54_321, 200_000, 1_234_567, 99_999_999] {
            let split = commission_split(price);
            assert_eq!(split.admin_commission + split.provider_payout, price);
        }
    }

    #[test]
    fn test_split_rounds_half_up() {
        // 30% of 99 is 29.7, rounds to 30
        let split = commission_split(99);
        assert_eq!(split.admin_commission, 30);
        assert_eq!(split.provider_payout, 69);

        // 30% of 101 is 30.3, rounds to 30
        let split = commission_split(101);
        assert_eq!(split.admin_commission, 30);
        assert_eq!(split.provider_payout, 71);
    }

    #[test]
    fn test_quote_standard_example() {
        // 200,000 IDR with a 10% code
        let quote = discount_quote(200_000, 10);
        assert_eq!(quote.discount_amount, 20_000);
        assert_eq!(quote.discounted_price, 180_000);
        assert_eq!(quote.admin_commission, 54_000);
        assert_eq!(quote.provider_payout, 126_000);
    }

    #[test]
    fn test_quote_without_discount() {
        let quote = discount_quote(150_000, 0);
        assert_eq!(quote.discount_amount, 0);
        assert_eq!(quote.discounted_price, 150_000);
        assert_eq!(quote.admin_commission, 45_000);
        assert_eq!(quote.provider_payout, 105_000);
    }

    #[test]
    fn test_commission_applies_after_discount() {
        // Commission on the discounted price, never the original
        let quote = discount_quote(100_000, 30);
        assert_eq!(quote.discounted_price, 70_000);
        assert_eq!(quote.admin_commission, 21_000);
        assert_eq!(quote.provider_payout, 49_000);
    }

    #[test]
    fn test_quote_parts_sum_to_original() {
        for price in [7_777i64, 123_456, 200_000, 999_999] {
            for pct in [5u8, 10, 15, 20, 30] {
                let q = discount_quote(price, pct);
                assert_eq!(q.discount_amount + q.discounted_price, q.original_price);
                assert_eq!(
                    q.admin_commission + q.provider_payout,
                    q.discounted_price,
                    "price={} pct={}",
                    price,
                    pct
                );
            }
        }
    }

    #[test]
    fn test_discount_rounding() {
        // 15% of 33,333 is 4,999.95, rounds to 5,000
        let quote = discount_quote(33_333, 15);
        assert_eq!(quote.discount_amount, 5_000);
        assert_eq!(quote.discounted_price, 28_333);
    }
}
