//! Serviceable location endpoint handlers.

use axum::{extract::State, Json};

use domain::models::location::{City, CountryResponse, ListLocationsResponse};
use persistence::repositories::LocationRepository;

use crate::app::AppState;
use crate::error::ApiError;

/// GET /api/v1/locations
///
/// Countries with their active cities, for the booking city picker.
pub async fn list_locations(
    State(state): State<AppState>,
) -> Result<Json<ListLocationsResponse>, ApiError> {
    let repo = LocationRepository::new(state.pool.clone());
    let country_entities = repo.list_countries().await?;
    let city_entities = repo.list_cities(None, true).await?;

    let cities: Vec<City> = city_entities.into_iter().map(Into::into).collect();

    let countries = country_entities
        .into_iter()
        .map(|entity| {
            let country: domain::models::location::Country = entity.into();
            let cities = cities
                .iter()
                .filter(|c| c.country_code == country.code)
                .cloned()
                .map(Into::into)
                .collect();
            CountryResponse {
                code: country.code,
                name: country.name,
                cities,
            }
        })
        .collect();

    Ok(Json(ListLocationsResponse { countries }))
}
