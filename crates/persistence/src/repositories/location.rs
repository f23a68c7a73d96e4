//! Country and city repository implementation.

use sqlx::PgPool;

use crate::entities::{CityEntity, CountryEntity};

/// Repository for serviceable location database operations.
#[derive(Clone)]
pub struct LocationRepository {
    pool: PgPool,
}

impl LocationRepository {
    /// Creates a new location repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists all countries, alphabetically.
    pub async fn list_countries(&self) -> Result<Vec<CountryEntity>, sqlx::Error> {
        sqlx::query_as::<_, CountryEntity>(
            r#"
            SELECT code, name FROM countries
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Lists cities, optionally scoped to a country or to active ones.
    pub async fn list_cities(
        &self,
        country_code: Option<&str>,
        active_only: bool,
    ) -> Result<Vec<CityEntity>, sqlx::Error> {
        sqlx::query_as::<_, CityEntity>(
            r#"
            SELECT * FROM cities
            WHERE ($1::text IS NULL OR country_code = upper($1))
              AND (NOT $2 OR is_active = TRUE)
            ORDER BY country_code ASC, name ASC
            "#,
        )
        .bind(country_code)
        .bind(active_only)
        .fetch_all(&self.pool)
        .await
    }

    /// Adds a city. The UNIQUE (country_code, name) constraint rejects
    /// duplicates as a conflict.
    pub async fn create_city(
        &self,
        country_code: &str,
        name: &str,
    ) -> Result<CityEntity, sqlx::Error> {
        sqlx::query_as::<_, CityEntity>(
            r#"
            INSERT INTO cities (country_code, name)
            VALUES (upper($1), $2)
            RETURNING *
            "#,
        )
        .bind(country_code)
        .bind(name)
        .fetch_one(&self.pool)
        .await
    }

    /// Toggles whether a city accepts new bookings.
    pub async fn set_city_active(
        &self,
        city_id: i64,
        is_active: bool,
    ) -> Result<Option<CityEntity>, sqlx::Error> {
        sqlx::query_as::<_, CityEntity>(
            r#"
            UPDATE cities
            SET is_active = $2
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(city_id)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await
    }
}
