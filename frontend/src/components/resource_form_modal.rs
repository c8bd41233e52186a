use shared::form::FormValues;
use shared::{FieldKind, FieldMapping, Resource};
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement, MouseEvent};
use yew::prelude::*;

/// The record a manager has open in the form; a `None` id means create.
#[derive(Clone, PartialEq)]
pub struct Editing {
    pub id: Option<i64>,
    pub initial: FormValues,
}

impl Editing {
    pub fn create(initial: FormValues) -> Self {
        Self { id: None, initial }
    }

    pub fn edit<R: Resource>(row: &R) -> Self {
        Self { id: Some(row.id()), initial: FormValues::from_row(row) }
    }

    pub fn title(&self, resource: &str) -> String {
        match self.id {
            Some(_) => format!("Edit {}", resource),
            None => format!("New {}", resource),
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct ResourceFormModalProps {
    pub is_open: bool,
    pub title: AttrValue,
    pub fields: &'static [FieldMapping],
    /// Field rendered as a select over `parent_options`
    #[prop_or_default]
    pub parent_field: Option<&'static str>,
    #[prop_or_default]
    pub parent_options: Vec<(i64, String)>,
    pub initial: FormValues,
    pub on_submit: Callback<FormValues>,
    pub on_close: Callback<()>,
}

#[function_component(ResourceFormModal)]
pub fn resource_form_modal(props: &ResourceFormModalProps) -> Html {
    let values = use_state(|| props.initial.clone());

    // Reset the inputs each time the modal opens
    use_effect_with((props.is_open, props.initial.clone()), {
        let values = values.clone();
        move |(is_open, initial)| {
            if *is_open {
                values.set(initial.clone());
            }
            || ()
        }
    });

    if !props.is_open {
        return html! {};
    }

    let on_change = |field: &'static str| {
        let values = values.clone();
        Callback::from(move |value: String| {
            let mut next = (*values).clone();
            next.set(field, value);
            values.set(next);
        })
    };

    let on_submit = {
        let values = values.clone();
        let on_submit = props.on_submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            on_submit.emit((*values).clone());
        })
    };

    let on_backdrop_click = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    let on_cancel = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    let input_for = |mapping: &'static FieldMapping| -> Html {
        let id = format!("field-{}", mapping.field);
        let current = values.get(mapping.field).to_string();
        let on_change = on_change(mapping.field);

        if props.parent_field == Some(mapping.field) {
            let onchange = Callback::from(move |e: Event| {
                let select: HtmlSelectElement = e.target_unchecked_into();
                on_change.emit(select.value());
            });
            return html! {
                <select {id} class="form-input" {onchange} required=true>
                    <option value="" selected={current.is_empty()}>{"Select..."}</option>
                    {for props.parent_options.iter().map(|(option_id, name)| {
                        let value = option_id.to_string();
                        let selected = value == current;
                        html! { <option {value} {selected}>{name}</option> }
                    })}
                </select>
            };
        }

        if mapping.field == "description" {
            let oninput = Callback::from(move |e: InputEvent| {
                let area: HtmlTextAreaElement = e.target_unchecked_into();
                on_change.emit(area.value());
            });
            return html! {
                <textarea {id} class="form-input" rows="4" value={current} {oninput} required=true />
            };
        }

        let (input_type, step) = match mapping.kind {
            FieldKind::Text => ("text", None),
            FieldKind::Integer => ("number", Some("1")),
            FieldKind::Real => ("number", Some("any")),
        };
        let oninput = Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            on_change.emit(input.value());
        });
        html! {
            <input {id} type={input_type} {step} class="form-input" value={current} {oninput} required=true />
        }
    };

    html! {
        <div class="modal-backdrop" onclick={on_backdrop_click}>
            <div class="modal" onclick={Callback::from(|e: MouseEvent| e.stop_propagation())}>
                <div class="modal-header">
                    <h2>{props.title.clone()}</h2>
                    <button type="button" class="modal-close" onclick={on_cancel.clone()}>{"×"}</button>
                </div>
                <form class="modal-form" onsubmit={on_submit}>
                    {for props.fields.iter().map(|mapping| html! {
                        <div class="form-group" key={mapping.field}>
                            <label for={format!("field-{}", mapping.field)}>{mapping.label}</label>
                            {input_for(mapping)}
                        </div>
                    })}
                    <div class="modal-buttons">
                        <button type="submit" class="btn btn-primary">{"Save"}</button>
                        <button type="button" class="btn btn-secondary" onclick={on_cancel}>{"Cancel"}</button>
                    </div>
                </form>
            </div>
        </div>
    }
}
