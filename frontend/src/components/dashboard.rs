use gloo::console;
use shared::catalog::{group_digits, CatalogStats};
use shared::{City, Continent, Country};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::api::ApiClient;

#[derive(Properties, PartialEq)]
pub struct DashboardProps {
    pub api_client: ApiClient,
}

#[function_component(Dashboard)]
pub fn dashboard(props: &DashboardProps) -> Html {
    let stats = use_state(|| Option::<CatalogStats>::None);
    let failed = use_state(|| false);

    {
        let api_client = props.api_client.clone();
        let stats = stats.clone();
        let failed = failed.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                let (continents, countries, cities) = futures::join!(
                    api_client.list::<Continent>(),
                    api_client.list::<Country>(),
                    api_client.list::<City>()
                );
                match (continents, countries, cities) {
                    (Ok(continents), Ok(countries), Ok(cities)) => {
                        stats.set(Some(CatalogStats::compute(&continents, &countries, &cities)));
                    }
                    (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
                        console::error!(format!("Failed to load dashboard: {}", e));
                        failed.set(true);
                    }
                }
            });
            || ()
        });
    }

    let content = match (*stats).as_ref() {
        Some(stats) => html! {
            <div class="stat-grid">
                {stat_card("Continents", stats.continents.to_string())}
                {stat_card("Countries", stats.countries.to_string())}
                {stat_card("Cities", stats.cities.to_string())}
                {stat_card("Total population", group_digits(stats.total_population, '.'))}
            </div>
        },
        None if *failed => html! {
            <div class="form-message error">{"Could not reach the GeoWiki server"}</div>
        },
        None => html! { <div class="loading">{"Loading..."}</div> },
    };

    html! {
        <section class="dashboard">
            <h2>{"Overview"}</h2>
            {content}
        </section>
    }
}

fn stat_card(label: &'static str, value: String) -> Html {
    html! {
        <div class="stat-card">
            <span class="stat-value">{value}</span>
            <span class="stat-label">{label}</span>
        </div>
    }
}
