use gloo::console;
use shared::catalog::filter_records;
use shared::form::FormValues;
use shared::{Continent, CONTINENT_FIELDS};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use super::resource_form_modal::{Editing, ResourceFormModal};
use crate::hooks::{use_resource_list, ListAction, SaveRequest};
use crate::services::api::ApiClient;

#[derive(Properties, PartialEq)]
pub struct ContinentManagerProps {
    pub api_client: ApiClient,
}

#[function_component(ContinentManager)]
pub fn continent_manager(props: &ContinentManagerProps) -> Html {
    let continents = use_resource_list::<Continent>(&props.api_client);
    let loading = use_state(|| true);
    let search = use_state(String::new);
    let editing = use_state(|| Option::<Editing>::None);

    {
        let api_client = props.api_client.clone();
        let list = continents.list.clone();
        let loading = loading.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                match api_client.list::<Continent>().await {
                    Ok(items) => list.dispatch(ListAction::Replace(items)),
                    Err(e) => console::error!(format!("Failed to load continents: {}", e)),
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

    let on_add = {
        let editing = editing.clone();
        Callback::from(move |_: MouseEvent| {
            editing.set(Some(Editing::create(FormValues::default())));
        })
    };

    let on_close = {
        let editing = editing.clone();
        Callback::from(move |_: ()| editing.set(None))
    };

    let on_submit = {
        let editing = editing.clone();
        let save = continents.save.clone();
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

    let visible = filter_records(&continents.list.items, &search, None);

    html! {
        <section class="manager">
            <div class="manager-toolbar">
                <h2>{"Continents"}</h2>
                <input
                    type="search"
                    class="search-input"
                    placeholder="Search continents..."
                    value={(*search).clone()}
                    oninput={on_search}
                />
                <button class="btn btn-primary" onclick={on_add}>{"Add continent"}</button>
            </div>

            {if *loading {
                html! { <div class="loading">{"Loading continents..."}</div> }
            } else if visible.is_empty() {
                html! { <div class="empty">{"No continents found"}</div> }
            } else {
                html! {
                    <div class="card-grid">
                        {for visible.iter().map(|continent| {
                            let on_edit = {
                                let editing = editing.clone();
                                let refresh_one = continents.refresh_one.clone();
                                let id = continent.id;
                                Callback::from(move |_: MouseEvent| {
                                    let editing = editing.clone();
                                    let on_loaded = Callback::from(move |latest: Continent| {
                                        editing.set(Some(Editing::edit(&latest)))
                                    });
                                    refresh_one.emit((id, on_loaded));
                                })
                            };
                            let on_delete = {
                                let remove = continents.remove.clone();
                                let id = continent.id;
                                Callback::from(move |_: MouseEvent| remove.emit(id))
                            };
                            html! {
                                <div class="card" key={continent.id}>
                                    <h3>{&continent.name}</h3>
                                    <p>{&continent.description}</p>
                                    <div class="card-actions">
                                        <button class="btn btn-secondary" onclick={on_edit}>{"Edit"}</button>
                                        <button class="btn btn-danger" onclick={on_delete}>{"Delete"}</button>
                                    </div>
                                </div>
                            }
                        })}
                    </div>
                }
            }}

            <ResourceFormModal
                is_open={editing.is_some()}
                title={editing.as_ref().map(|e| e.title("continent")).unwrap_or_default()}
                fields={CONTINENT_FIELDS}
                initial={editing.as_ref().map(|e| e.initial.clone()).unwrap_or_default()}
                {on_submit}
                {on_close}
            />
        </section>
    }
}
