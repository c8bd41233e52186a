//! Current conditions from the public Open-Meteo forecast API.

use gloo::net::http::Request;
use shared::weather::{forecast_url, CurrentConditions, ForecastResponse};

pub async fn fetch_current_conditions(
    latitude: f64,
    longitude: f64,
) -> Result<CurrentConditions, String> {
    let response = Request::get(&forecast_url(latitude, longitude))
        .send()
        .await
        .map_err(|e| format!("Failed to fetch weather: {}", e))?;

    if !response.ok() {
        return Err(format!("Weather service answered {}", response.status()));
    }

    let forecast = response
        .json::<ForecastResponse>()
        .await
        .map_err(|e| format!("Failed to parse weather: {}", e))?;
    Ok(CurrentConditions::from_forecast(&forecast))
}
