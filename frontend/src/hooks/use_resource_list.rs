use std::rc::Rc;

use gloo::console;
use gloo::dialogs::{alert, confirm};
use shared::catalog::{remove_by_id, upsert};
use shared::form::FormValues;
use shared::Resource;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::api::ApiClient;

/// Local copy of one collection. It mirrors the server on a best-effort basis:
/// responses are merged in as they arrive and the list is only re-read on mount.
#[derive(PartialEq)]
pub struct ListState<R> {
    pub items: Vec<R>,
}

impl<R> Default for ListState<R> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

pub enum ListAction<R> {
    Replace(Vec<R>),
    Upsert(R),
    Remove(i64),
}

impl<R: Resource> Reducible for ListState<R> {
    type Action = ListAction<R>;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut items = self.items.clone();
        match action {
            ListAction::Replace(fresh) => items = fresh,
            ListAction::Upsert(record) => upsert(&mut items, record),
            ListAction::Remove(id) => remove_by_id(&mut items, id),
        }
        Rc::new(Self { items })
    }
}

/// A create (no id) or full edit (with id) submitted from the form modal
pub struct SaveRequest {
    pub id: Option<i64>,
    pub values: FormValues,
    /// Called once the server accepted the change
    pub on_saved: Callback<()>,
}

pub struct UseResourceListResult<R: Resource> {
    pub list: UseReducerHandle<ListState<R>>,
    /// Re-read one record, merge it into the list and hand it to the callback
    pub refresh_one: Callback<(i64, Callback<R>)>,
    pub save: Callback<SaveRequest>,
    pub remove: Callback<i64>,
}

#[hook]
pub fn use_resource_list<R: Resource>(api_client: &ApiClient) -> UseResourceListResult<R> {
    let list = use_reducer(ListState::<R>::default);

    let refresh_one = {
        let api_client = api_client.clone();
        let list = list.clone();
        Callback::from(move |(id, on_loaded): (i64, Callback<R>)| {
            let api_client = api_client.clone();
            let list = list.clone();

            spawn_local(async move {
                match api_client.get::<R>(id).await {
                    Ok(record) => {
                        list.dispatch(ListAction::Upsert(record.clone()));
                        on_loaded.emit(record);
                    }
                    Err(e) => {
                        console::error!(format!("Failed to load {} {}: {}", R::NAME, id, e));
                        if e.status == 404 {
                            list.dispatch(ListAction::Remove(id));
                        }
                        alert(&format!("Could not load the {}.\n{}", R::NAME, e));
                    }
                }
            });
        })
    };

    let save = {
        let api_client = api_client.clone();
        let list = list.clone();
        Callback::from(move |request: SaveRequest| {
            let SaveRequest { id, values, on_saved } = request;
            let api_client = api_client.clone();
            let list = list.clone();

            spawn_local(async move {
                let result = match id {
                    Some(id) => match values.to_update::<R>() {
                        Ok(changes) => api_client
                            .update::<R>(id, &changes)
                            .await
                            .map_err(|e| e.to_string()),
                        Err(errors) => Err(describe_field_errors(&errors)),
                    },
                    None => match values.to_create::<R>() {
                        Ok(input) => api_client
                            .create::<R>(&input)
                            .await
                            .map_err(|e| e.to_string()),
                        Err(errors) => Err(describe_field_errors(&errors)),
                    },
                };

                match result {
                    Ok(record) => {
                        console::log!(format!("Saved {} {}", R::NAME, record.id()));
                        list.dispatch(ListAction::Upsert(record));
                        on_saved.emit(());
                    }
                    Err(e) => {
                        console::error!(format!("Failed to save {}: {}", R::NAME, e));
                        alert(&format!("Could not save the {}.\n{}", R::NAME, e));
                    }
                }
            });
        })
    };

    let remove = {
        let api_client = api_client.clone();
        let list = list.clone();
        Callback::from(move |id: i64| {
            if !confirm(&format!("Delete this {}?", R::NAME)) {
                return;
            }
            let api_client = api_client.clone();
            let list = list.clone();

            spawn_local(async move {
                match api_client.delete::<R>(id).await {
                    Ok(_) => {
                        console::log!(format!("Deleted {} {}", R::NAME, id));
                        list.dispatch(ListAction::Remove(id));
                    }
                    Err(e) => {
                        console::error!(format!("Failed to delete {} {}: {}", R::NAME, id, e));
                        alert(&format!("Could not delete the {}.\n{}", R::NAME, e));
                    }
                }
            });
        })
    };

    UseResourceListResult {
        list,
        refresh_one,
        save,
        remove,
    }
}

fn describe_field_errors(errors: &[shared::FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
