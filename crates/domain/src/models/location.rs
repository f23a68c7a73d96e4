//! Serviceable countries and cities.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A country the marketplace operates in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    /// ISO 3166-1 alpha-2 code, uppercase.
    pub code: String,
    pub name: String,
}

/// A city within a serviceable country. Inactive cities stay listed for
/// historical bookings but accept no new ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub id: i64,
    pub country_code: String,
    pub name: String,
    pub is_active: bool,
}

/// Request payload for adding a city (admin).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCityRequest {
    #[validate(length(equal = 2, message = "Country code must be 2 letters"))]
    pub country_code: String,

    #[validate(length(min = 1, max = 100, message = "City name is required"))]
    pub name: String,
}

/// Response payload for a city.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityResponse {
    pub country_code: String,
    pub name: String,
    pub is_active: bool,
}

impl From<City> for CityResponse {
    fn from(c: City) -> Self {
        Self {
            country_code: c.country_code,
            name: c.name,
            is_active: c.is_active,
        }
    }
}

/// Response for listing countries with their cities.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryResponse {
    pub code: String,
    pub name: String,
    pub cities: Vec<CityResponse>,
}

/// Response for listing locations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLocationsResponse {
    pub countries: Vec<CountryResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_city_request_validation() {
        let ok = CreateCityRequest {
            country_code: "ID".to_string(),
            name: "Ubud".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad_code = CreateCityRequest {
            country_code: "IDN".to_string(),
            name: "Ubud".to_string(),
        };
        assert!(bad_code.validate().is_err());

        let empty_name = CreateCityRequest {
            country_code: "ID".to_string(),
            name: String::new(),
        };
        assert!(empty_name.validate().is_err());
    }

    #[test]
    fn test_city_response_conversion() {
        let city = City {
            id: 7,
            country_code: "ID".to_string(),
            name: "Denpasar".to_string(),
            is_active: true,
        };
        let response = CityResponse::from(city);
        assert_eq!(response.country_code, "ID");
        assert!(response.is_active);
    }
}
