//! Country and city database entities.

use sqlx::FromRow;

use domain::models::location::{City, Country};

/// Database entity for countries table.
#[derive(Debug, Clone, FromRow)]
pub struct CountryEntity {
    pub code: String,
    pub name: String,
}

/// Database entity for cities table.
#[derive(Debug, Clone, FromRow)]
pub struct CityEntity {
    pub id: i64,
    pub country_code: String,
    pub name: String,
    pub is_active: bool,
}

impl From<CountryEntity> for Country {
    fn from(entity: CountryEntity) -> Self {
        Self {
            code: entity.code,
            name: entity.name,
        }
    }
}

impl From<CityEntity> for City {
    fn from(entity: CityEntity) -> Self {
        Self {
            id: entity.id,
            country_code: entity.country_code,
            name: entity.name,
            is_active: entity.is_active,
        }
    }
}
