//! Open-Meteo forecast types and the reduction to a "current conditions" panel.

use serde::Deserialize;

pub const OPEN_METEO_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Request URL for current weather plus the hourly series the panel reads.
pub fn forecast_url(latitude: f64, longitude: f64) -> String {
    format!(
        "{}?latitude={}&longitude={}&current_weather=true&hourly=relativehumidity_2m,pressure_msl,visibility&windspeed_unit=kmh&temperature_unit=celsius&timezone=auto",
        OPEN_METEO_FORECAST_URL, latitude, longitude
    )
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub current_weather: Option<CurrentWeather>,
    #[serde(default)]
    pub hourly: Option<HourlySeries>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurrentWeather {
    pub time: String,
    pub temperature: f64,
    pub windspeed: f64,
    pub weathercode: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HourlySeries {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub relativehumidity_2m: Vec<Option<f64>>,
    #[serde(default)]
    pub pressure_msl: Vec<Option<f64>>,
    #[serde(default)]
    pub visibility: Vec<Option<f64>>,
}

/// WMO weather interpretation code to a short description.
pub fn describe_weather_code(code: u32) -> &'static str {
    match code {
        0 => "Clear sky",
        1 | 2 => "Partly cloudy",
        3 => "Overcast",
        45..=48 => "Fog",
        51..=57 => "Drizzle",
        61..=67 => "Rain",
        71..=77 => "Snow",
        80..=82 => "Rain showers",
        95.. => "Thunderstorm",
        _ => "Unknown conditions",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    /// °C
    pub temperature: Option<f64>,
    pub description: String,
    /// %
    pub humidity: Option<f64>,
    /// km/h
    pub wind_speed: Option<f64>,
    /// hPa
    pub pressure: Option<f64>,
    /// metres
    pub visibility: Option<f64>,
}

impl CurrentConditions {
    /// Hourly values are taken at the sample whose timestamp equals the current one,
    /// falling back to the first sample.
    pub fn from_forecast(forecast: &ForecastResponse) -> Self {
        let current = forecast.current_weather.as_ref();

        let (humidity, pressure, visibility) = match (forecast.hourly.as_ref(), current) {
            (Some(hourly), Some(current)) => {
                let index = hourly
                    .time
                    .iter()
                    .position(|time| *time == current.time)
                    .unwrap_or(0);
                let at = |series: &[Option<f64>]| series.get(index).copied().flatten();
                (
                    at(&hourly.relativehumidity_2m),
                    at(&hourly.pressure_msl),
                    at(&hourly.visibility),
                )
            }
            _ => (None, None, None),
        };

        Self {
            temperature: current.map(|c| c.temperature),
            description: current
                .map(|c| describe_weather_code(c.weathercode as u32).to_string())
                .unwrap_or_else(|| "No data available".to_string()),
            humidity,
            wind_speed: current.map(|c| c.windspeed),
            pressure,
            visibility,
        }
    }
}
