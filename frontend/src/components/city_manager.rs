use gloo::console;
use shared::catalog::{filter_records, find_by_id, group_digits};
use shared::form::FormValues;
use shared::{City, Country, CITY_FIELDS};
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use super::resource_form_modal::{Editing, ResourceFormModal};
use crate::hooks::{use_resource_list, ListAction, SaveRequest};
use crate::services::api::ApiClient;

#[derive(Properties, PartialEq)]
pub struct CityManagerProps {
    pub api_client: ApiClient,
}

#[function_component(CityManager)]
pub fn city_manager(props: &CityManagerProps) -> Html {
    let cities = use_resource_list::<City>(&props.api_client);
    let countries = use_state(Vec::<Country>::new);
    let loading = use_state(|| true);
    let search = use_state(String::new);
    let country_filter = use_state(|| Option::<i64>::None);
    let editing = use_state(|| Option::<Editing>::None);

    {
        let api_client = props.api_client.clone();
        let list = cities.list.clone();
        let countries = countries.clone();
        let loading = loading.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                let (city_result, country_result) = futures::join!(
                    api_client.list::<City>(),
                    api_client.list::<Country>()
                );
                match (city_result, country_result) {
                    (Ok(city_items), Ok(country_items)) => {
                        list.dispatch(ListAction::Replace(city_items));
                        countries.set(country_items);
                    }
                    (Err(e), _) | (_, Err(e)) => {
                        console::error!(format!("Failed to load cities: {}", e));
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
        let country_filter = country_filter.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            country_filter.set(select.value().parse::<i64>().ok());
        })
    };

    let on_add = {
        let editing = editing.clone();
        let country_filter = country_filter.clone();
        Callback::from(move |_: MouseEvent| {
            let mut initial = FormValues::default();
            if let Some(id) = *country_filter {
                initial.set("countryId", id.to_string());
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
        let save = cities.save.clone();
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

    let visible = filter_records(&cities.list.items, &search, *country_filter);
    let country_options: Vec<(i64, String)> = countries
        .iter()
        .map(|country| (country.id, country.name.clone()))
        .collect();

    html! {
        <section class="manager">
            <div class="manager-toolbar">
                <h2>{"Cities"}</h2>
                <input
                    type="search"
                    class="search-input"
                    placeholder="Search cities..."
                    value={(*search).clone()}
                    oninput={on_search}
                />
                <select class="filter-select" onchange={on_filter}>
                    <option value="" selected={country_filter.is_none()}>{"All countries"}</option>
                    {for countries.iter().map(|country| html! {
                        <option
                            value={country.id.to_string()}
                            selected={*country_filter == Some(country.id)}
                        >
                            {&country.name}
                        </option>
                    })}
                </select>
                <button class="btn btn-primary" onclick={on_add}>{"Add city"}</button>
            </div>

            {if *loading {
                html! { <div class="loading">{"Loading cities..."}</div> }
            } else if visible.is_empty() {
                html! { <div class="empty">{"No cities found"}</div> }
            } else {
                html! {
                    <div class="table-container">
                        <table class="catalog-table">
                            <thead>
                                <tr>
                                    <th>{"Name"}</th>
                                    <th>{"Population"}</th>
                                    <th>{"Latitude"}</th>
                                    <th>{"Longitude"}</th>
                                    <th>{"Country"}</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                {for visible.iter().map(|city| {
                                    let on_edit = {
                                        let editing = editing.clone();
                                        let refresh_one = cities.refresh_one.clone();
                                        let id = city.id;
                                        Callback::from(move |_: MouseEvent| {
                                            let editing = editing.clone();
                                            let on_loaded = Callback::from(move |latest: City| {
                                                editing.set(Some(Editing::edit(&latest)))
                                            });
                                            refresh_one.emit((id, on_loaded));
                                        })
                                    };
                                    let on_delete = {
                                        let remove = cities.remove.clone();
                                        let id = city.id;
                                        Callback::from(move |_: MouseEvent| remove.emit(id))
                                    };
                                    let country_name = find_by_id(countries.as_slice(), city.country_id)
                                        .map(|country| format!("{} {}", country.flag, country.name))
                                        .unwrap_or_else(|| "Unknown".to_string());
                                    html! {
                                        <tr key={city.id}>
                                            <td>{&city.name}</td>
                                            <td class="number">{group_digits(city.population, '.')}</td>
                                            <td class="number">{format!("{:.4}", city.latitude)}</td>
                                            <td class="number">{format!("{:.4}", city.longitude)}</td>
                                            <td>{country_name}</td>
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
                title={editing.as_ref().map(|e| e.title("city")).unwrap_or_default()}
                fields={CITY_FIELDS}
                parent_field={Some("countryId")}
                parent_options={country_options}
                initial={editing.as_ref().map(|e| e.initial.clone()).unwrap_or_default()}
                {on_submit}
                {on_close}
            />
        </section>
    }
}
