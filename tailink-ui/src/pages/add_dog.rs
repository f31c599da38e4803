//! Add Dog Page
//!
//! Uploads a dog profile for the logged-in owner.

use leptos::*;
use leptos_router::*;
use tailink::{AppRoute, NewDog};

use crate::api;
use crate::components::{selected_file, FileField, FormCard, SubmitButton, TextArea, TextField};
use crate::state::global::{alert, log_error, log_info, GlobalState};

/// Dog profile form
#[component]
pub fn AddDog() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let navigate = use_navigate();

    let name = create_rw_signal(String::new());
    let breed = create_rw_signal(String::new());
    let age = create_rw_signal(String::new());
    let about = create_rw_signal(String::new());
    let picture = create_node_ref::<html::Input>();

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();

        let Some(session) = state.session() else {
            log_error("No session token; log in first");
            alert("Error adding dog");
            return;
        };

        let form = NewDog {
            name: name.get_untracked(),
            breed: breed.get_untracked(),
            age: age.get_untracked(),
            about: about.get_untracked(),
            picture: None,
        }
        .to_form();
        let file = selected_file(picture);
        let navigate = navigate.clone();

        state.loading.set(true);
        spawn_local(async move {
            match api::create_dog(&session, &form, file.as_ref()).await {
                Ok(dog) => {
                    log_info(&format!("Added dog {}", dog.name));
                    alert("Dog added successfully!");
                    navigate(AppRoute::SetAvailability.path(), Default::default());
                }
                Err(e) => {
                    log_error(&format!("Failed to add dog: {}", e));
                    alert("Error adding dog");
                }
            }
            state.loading.set(false);
        });
    };

    view! {
        <FormCard title="🐶 Add Your Dog">
            <form on:submit=on_submit class="space-y-4">
                <TextField label="Name" value=name />
                <TextField label="Breed" value=breed />
                <TextField label="Age" value=age input_type="number" />
                <TextArea label="About" value=about />
                <FileField label="Picture" input_ref=picture />
                <SubmitButton label="Add Dog" busy=state.loading />
            </form>
        </FormCard>
    }
}
