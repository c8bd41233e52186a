use yew::prelude::*;

mod components;
mod hooks;
mod services;

use components::{CityManager, ContinentManager, CountryManager, Dashboard, Header, MapView, Tab};
use services::api::ApiClient;

#[function_component(App)]
fn app() -> Html {
    let api_client = use_memo((), |_| ApiClient::new());
    let active_tab = use_state(|| Tab::Dashboard);

    let on_select = {
        let active_tab = active_tab.clone();
        Callback::from(move |tab: Tab| active_tab.set(tab))
    };

    let api_client = (*api_client).clone();
    let page = match *active_tab {
        Tab::Dashboard => html! { <Dashboard {api_client} /> },
        Tab::Continents => html! { <ContinentManager {api_client} /> },
        Tab::Countries => html! { <CountryManager {api_client} /> },
        Tab::Cities => html! { <CityManager {api_client} /> },
        Tab::Map => html! { <MapView {api_client} /> },
    };

    html! {
        <>
            <Header active={*active_tab} {on_select} />
            <main class="main">
                <div class="container">
                    {page}
                </div>
            </main>
        </>
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}
