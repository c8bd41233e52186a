use gloo::console;
use shared::catalog::{filter_records, find_by_id, group_digits};
use shared::form::FormValues;
use shared::{Continent, Country, COUNTRY_FIELDS};
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use super::resource_form_modal::{Editing, ResourceFormModal};
use crate::hooks::{use_resource_list, ListAction, SaveRequest};
use crate::services::api::ApiClient;

#[derive(Properties, PartialEq)]
pub struct CountryManagerProps {
    pub api_client: ApiClient,
}

#[function_component(CountryManager)]
pub fn country_manager(props: &CountryManagerProps) -> Html {
    let countries = use_resource_list::<Country>(&props.api_client);
    let continents = use_state(Vec::<Continent>::new);
    let loading = use_state(|| true);
    let search = use_state(String::new);
    let continent_filter = use_state(|| Option::<i64>::None);
    let editing = use_state(|| Option::<Editing>::None);

    {
        let api_client = props.api_client.clone();
        let list = countries.list.clone();
        let continents = continents.clone();
        let loading = loading.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                let (country_result, continent_result) = futures::join!(
                    api_client.list::<Country>(),
                    api_client.list::<Continent>()
                );
                match (country_result, continent_result) {
                    (Ok(country_items), Ok(continent_items)) => {
                        list.dispatch(ListAction::Replace(country_items));
                        continents.set(continent_items);
                    }
                    (Err(e), _) | (_, Err(e)) => {
                        console::error!(format!("Failed to load countries: {}", e));
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

    let on_filter = {
        let continent_filter = continent_filter.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            continent_filter.set(select.value().parse::<i64>().ok());
        })
    };

    let on_add = {
        let editing = editing.clone();
        let continent_filter = continent_filter.clone();
        Callback::from(move |_: MouseEvent| {
            let mut initial = FormValues::default();
            if let Some(id) = *continent_filter {
                initial.set("continentId", id.to_string());
            }
            editing.set(Some(Editing::create(initial)));
        })
    };

    let on_close = {
        let editing = editing.clone();
        Callback::from(move |_: ()| editing.set(None))
    };

    let on_submit = {
        let editing = editing.clone();
        let save = countries.save.clone();
        Callback::from(move |values: FormValues| {
            let Some(current) = (*editing).clone() else { return };
            let editing = editing.clone();
            save.emit(SaveRequest {
                id: current.id,
                values,
                on_saved: Callback::from(move |_: ()| editing.set(None)),
            });
        })
    };

    let visible = filter_records(&countries.list.items, &search, *continent_filter);
    let continent_options: Vec<(i64, String)> = continents
        .iter()
        .map(|continent| (continent.id, continent.name.clone()))
        .collect();

    html! {
        <section class="manager">
            <div class="manager-toolbar">
                <h2>{"Countries"}</h2>
                <input
                    type="search"
                    class="search-input"
                    placeholder="Search countries..."
                    value={(*search).clone()}
                    oninput={on_search}
                />
                <select class="filter-select" onchange={on_filter}>
                    <option value="" selected={continent_filter.is_none()}>{"All continents"}</option>
                    {for continents.iter().map(|continent| html! {
                        <option
                            value={continent.id.to_string()}
                            selected={*continent_filter == Some(continent.id)}
                        >
                            {&continent.name}
                        </option>
                    })}
                </select>
                <button class="btn btn-primary" onclick={on_add}>{"Add country"}</button>
            </div>

            {if *loading {
                html! { <div class="loading">{"Loading countries..."}</div> }
            } else if visible.is_empty() {
                html! { <div class="empty">{"No countries found"}</div> }
            } else {
                html! {
                    <div class="table-container">
                        <table class="catalog-table">
                            <thead>
                                <tr>
                                    <th>{"Flag"}</th>
                                    <th>{"Name"}</th>
                                    <th>{"Language"}</th>
                                    <th>{"Currency"}</th>
                                    <th>{"Population"}</th>
                                    <th>{"Continent"}</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                {for visible.iter().map(|country| {
                                    let on_edit = {
                                        let editing = editing.clone();
                                        let refresh_one = countries.refresh_one.clone();
                                        let id = country.id;
                                        Callback::from(move |_: MouseEvent| {
                                            let editing = editing.clone();
                                            let on_loaded = Callback::from(move |latest: Country| {
                                                editing.set(Some(Editing::edit(&latest)))
                                            });
                                            refresh_one.emit((id, on_loaded));
                                        })
                                    };
                                    let on_delete = {
                                        let remove = countries.remove.clone();
                                        let id = country.id;
                                        Callback::from(move |_: MouseEvent| remove.emit(id))
                                    };
                                    let continent_name = find_by_id(continents.as_slice(), country.continent_id)
                                        .map(|continent| continent.name.clone())
                                        .unwrap_or_else(|| "Unknown".to_string());
                                    html! {
                                        <tr key={country.id}>
                                            <td class="flag">{&country.flag}</td>
                                            <td>{&country.name}</td>
                                            <td>{&country.language}</td>
                                            <td>{&country.coin}</td>
                                            <td class="number">{group_digits(country.population, '.')}</td>
                                            <td>{continent_name}</td>
                                            <td class="row-actions">
                                                <button class="btn btn-secondary" onclick={on_edit}>{"Edit"}</button>
                                                <button class="btn btn-danger" onclick={on_delete}>{"Delete"}</button>
                                            </td>
                                        </tr>
                                    }
                                })}
                            </tbody>
                        </table>
                    </div>
                }
            }}

            <ResourceFormModal
                is_open={editing.is_some()}
                title={editing.as_ref().map(|e| e.title("country")).unwrap_or_default()}
                fields={COUNTRY_FIELDS}
                parent_field={Some("continentId")}
                parent_options={continent_options}
                initial={editing.as_ref().map(|e| e.initial.clone()).unwrap_or_default()}
                {on_submit}
                {on_close}
            />
        </section>
    }
}
