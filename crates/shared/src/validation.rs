//! Common validation utilities.

use validator::ValidationError;

/// Discount percentages therapists are allowed to issue.
pub const ALLOWED_DISCOUNT_PERCENTAGES: [u8; 5] = [5, 10, 15, 20, 30];

/// Maximum money amount accepted on any request, in IDR.
/// Guards against fat-fingered amounts; well above any real service price.
pub const MAX_AMOUNT_IDR: i64 = 100_000_000;

/// Validates that a money amount (IDR) is positive and within bounds.
pub fn validate_amount_idr(amount: i64) -> Result<(), ValidationError> {
    if amount > 0 && amount <= MAX_AMOUNT_IDR {
        Ok(())
    } else {
        let mut err = ValidationError::new("amount_range");
        err.message = Some("Amount must be between 1 and 100,000,000 IDR".into());
        Err(err)
    }
}

/// Validates that a discount percentage is one of the allowed tiers.
pub fn validate_discount_percentage(percent: u8) -> Result<(), ValidationError> {
    if ALLOWED_DISCOUNT_PERCENTAGES.contains(&percent) {
        Ok(())
    } else {
        let mut err = ValidationError::new("discount_percentage");
        err.message = Some("Discount must be one of 5, 10, 15, 20 or 30 percent".into());
        Err(err)
    }
}

/// Validates that a latitude value is within valid range (-90 to 90).
pub fn validate_latitude(lat: f64) -> Result<(), ValidationError> {
    if (-90.0..=90.0).contains(&lat) {
        Ok(())
    } else {
        let mut err = ValidationError::new("latitude_range");
        err.message = Some("Latitude must be between -90 and 90".into());
        Err(err)
    }
}

/// Validates that a longitude value is within valid range (-180 to 180).
pub fn validate_longitude(lon: f64) -> Result<(), ValidationError> {
    if (-180.0..=180.0).contains(&lon) {
        Ok(())
    } else {
        let mut err = ValidationError::new("longitude_range");
        err.message = Some("Longitude must be between -180 and 180".into());
        Err(err)
    }
}

/// Validates a service duration in minutes (30 minutes to 4 hours).
pub fn validate_duration_minutes(minutes: i32) -> Result<(), ValidationError> {
    if (30..=240).contains(&minutes) {
        Ok(())
    } else {
        let mut err = ValidationError::new("duration_range");
        err.message = Some("Duration must be between 30 and 240 minutes".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_amount_idr() {
        assert!(validate_amount_idr(1).is_ok());
        assert!(validate_amount_idr(200_000).is_ok());
        assert!(validate_amount_idr(MAX_AMOUNT_IDR).is_ok());
        assert!(validate_amount_idr(0).is_err());
        assert!(validate_amount_idr(-500).is_err());
        assert!(validate_amount_idr(MAX_AMOUNT_IDR + 1).is_err());
    }

    #[test]
    fn test_validate_discount_percentage_allowed_tiers() {
        for p in ALLOWED_DISCOUNT_PERCENTAGES {
            assert!(validate_discount_percentage(p).is_ok());
        }
    }

    #[test]
    fn test_validate_discount_percentage_rejected() {
        assert!(validate_discount_percentage(0).is_err());
        assert!(validate_discount_percentage(7).is_err());
        assert!(validate_discount_percentage(25).is_err());
        assert!(validate_discount_percentage(50).is_err());
        assert!(validate_discount_percentage(100).is_err());
    }

    #[test]
    fn test_validate_latitude() {
        assert!(validate_latitude(0.0).is_ok());
        assert!(validate_latitude(90.0).is_ok());
        assert!(validate_latitude(-90.0).is_ok());
        assert!(validate_latitude(90.1).is_err());
        assert!(validate_latitude(-90.1).is_err());
    }

    #[test]
    fn test_validate_longitude() {
        assert!(validate_longitude(0.0).is_ok());
        assert!(validate_longitude(180.0).is_ok());
        assert!(validate_longitude(-180.0).is_ok());
        assert!(validate_longitude(180.1).is_err());
        assert!(validate_longitude(-180.1).is_err());
    }

    #[test]
    fn test_validate_duration_minutes() {
        assert!(validate_duration_minutes(30).is_ok());
        assert!(validate_duration_minutes(60).is_ok());
        assert!(validate_duration_minutes(240).is_ok());
        assert!(validate_duration_minutes(29).is_err());
        assert!(validate_duration_minutes(241).is_err());
        assert!(validate_duration_minutes(0).is_err());
    }
}
