use gloo::console;
use shared::catalog::{group_digits, place_cities, PlacedCity};
use shared::weather::CurrentConditions;
use shared::{City, Continent, Country};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::services::api::ApiClient;
use crate::services::weather::fetch_current_conditions;

/// Half-width of the embedded map's bounding box, in degrees
const MAP_SPAN: f64 = 0.1;

/// OpenStreetMap embed centred on a point with a marker on it
pub fn osm_embed_url(latitude: f64, longitude: f64) -> String {
    format!(
        "https://www.openstreetmap.org/export/embed.html?bbox={:.4},{:.4},{:.4},{:.4}&layer=mapnik&marker={:.4},{:.4}",
        longitude - MAP_SPAN,
        latitude - MAP_SPAN,
        longitude + MAP_SPAN,
        latitude + MAP_SPAN,
        latitude,
        longitude
    )
}

#[derive(Clone, PartialEq)]
enum WeatherState {
    Idle,
    Loading,
    Ready(CurrentConditions),
    Failed(String),
}

#[derive(Properties, PartialEq)]
pub struct MapViewProps {
    pub api_client: ApiClient,
}

#[function_component(MapView)]
pub fn map_view(props: &MapViewProps) -> Html {
    let placed = use_state(Vec::<PlacedCity>::new);
    let loading = use_state(|| true);
    let search = use_state(String::new);
    let selected = use_state(|| Option::<PlacedCity>::None);
    let weather = use_state(|| WeatherState::Idle);

    {
        let api_client = props.api_client.clone();
        let placed = placed.clone();
        let loading = loading.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                let (cities, countries, continents) = futures::join!(
                    api_client.list::<City>(),
                    api_client.list::<Country>(),
                    api_client.list::<Continent>()
                );
                match (cities, countries, continents) {
                    (Ok(cities), Ok(countries), Ok(continents)) => {
                        placed.set(place_cities(&cities, &countries, &continents));
                    }
                    (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
                        console::error!(format!("Failed to load map data: {}", e));
                    }
                }
                loading.set(false);
            });
            || ()
        });
    }

    let on_search = {
        let search = search.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            search.set(input.value());
        })
    };

    let select_city = {
        let selected = selected.clone();
        let weather = weather.clone();
        Callback::from(move |entry: PlacedCity| {
            let (latitude, longitude) = (entry.city.latitude, entry.city.longitude);
            selected.set(Some(entry));
            weather.set(WeatherState::Loading);

            let weather = weather.clone();
            spawn_local(async move {
                match fetch_current_conditions(latitude, longitude).await {
                    Ok(conditions) => weather.set(WeatherState::Ready(conditions)),
                    Err(e) => {
                        console::error!(e.clone());
                        weather.set(WeatherState::Failed(e));
                    }
                }
            });
        })
    };

    let visible: Vec<&PlacedCity> = placed.iter().filter(|entry| entry.matches(&search)).collect();

    html! {
        <section class="map-view">
            <aside class="map-sidebar">
                <input
                    type="search"
                    class="search-input"
                    placeholder="Search city, country or continent..."
                    value={(*search).clone()}
                    oninput={on_search}
                />
                {if *loading {
                    html! { <div class="loading">{"Loading cities..."}</div> }
                } else if visible.is_empty() {
                    html! { <div class="empty">{"No cities found"}</div> }
                } else {
                    html! {
                        <ul class="city-list">
                            {for visible.iter().map(|entry| {
                                let is_selected = selected.as_ref().map(|s| s.city.id) == Some(entry.city.id);
                                let onclick = {
                                    let select_city = select_city.clone();
                                    let entry = (*entry).clone();
                                    Callback::from(move |_: MouseEvent| select_city.emit(entry.clone()))
                                };
                                html! {
                                    <li
                                        key={entry.city.id}
                                        class={classes!("city-item", is_selected.then_some("selected"))}
                                        {onclick}
                                    >
                                        <strong>{&entry.city.name}</strong>
                                        <span class="city-place">
                                            {[entry.country_name.as_deref(), entry.continent_name.as_deref()]
                                                .into_iter()
                                                .flatten()
                                                .collect::<Vec<_>>()
                                                .join(", ")}
                                        </span>
                                    </li>
                                }
                            })}
                        </ul>
                    }
                }}
            </aside>

            <div class="map-main">
                {match selected.as_ref() {
                    Some(entry) => html! {
                        <>
                            <iframe
                                class="map-frame"
                                title={format!("Map of {}", entry.city.name)}
                                src={osm_embed_url(entry.city.latitude, entry.city.longitude)}
                            />
                            <div class="city-details">
                                <h2>{&entry.city.name}</h2>
                                <p>{format!("Population: {}", group_digits(entry.city.population, '.'))}</p>
                                <p>{format!("Coordinates: {:.4}, {:.4}", entry.city.latitude, entry.city.longitude)}</p>
                                {weather_panel(&weather)}
                            </div>
                        </>
                    },
                    None => html! {
                        <div class="map-placeholder">{"Select a city to see it on the map"}</div>
                    },
                }}
            </div>
        </section>
    }
}

fn weather_panel(state: &WeatherState) -> Html {
    let reading = |value: Option<f64>, unit: &str| match value {
        Some(value) => format!("{:.1} {}", value, unit),
        None => "n/a".to_string(),
    };

    match state {
        WeatherState::Idle => html! {},
        WeatherState::Loading => html! { <div class="loading">{"Loading weather..."}</div> },
        WeatherState::Failed(message) => html! { <div class="form-message error">{message}</div> },
        WeatherState::Ready(conditions) => html! {
            <div class="weather-panel">
                <h3>{"Current weather"}</h3>
                <p class="weather-description">{&conditions.description}</p>
                <dl>
                    <dt>{"Temperature"}</dt><dd>{reading(conditions.temperature, "°C")}</dd>
                    <dt>{"Wind"}</dt><dd>{reading(conditions.wind_speed, "km/h")}</dd>
                    <dt>{"Humidity"}</dt><dd>{reading(conditions.humidity, "%")}</dd>
                    <dt>{"Pressure"}</dt><dd>{reading(conditions.pressure, "hPa")}</dd>
                    <dt>{"Visibility"}</dt><dd>{reading(conditions.visibility.map(|metres| metres / 1000.0), "km")}</dd>
                </dl>
            </div>
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embed_url_centres_on_city() {
        let url = osm_embed_url(-23.5505, -46.6333);
        assert_eq!(
            url,
            "https://www.openstreetmap.org/export/embed.html?bbox=-46.7333,-23.6505,-46.5333,-23.4505&layer=mapnik&marker=-23.5505,-46.6333"
        );
    }
}
