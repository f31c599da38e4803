//! Set Availability Page
//!
//! Offers one of the owner's dogs at a place for a time window.

use leptos::*;
use tailink::schedule;
use tailink::{NewAvailability, Session};

use crate::api::{self, RequestError};
use crate::components::{FormCard, SelectField, SubmitButton, TextField};
use crate::state::global::{alert, log_error, log_info, GlobalState};

/// Current user and their dog names, fetched one after the other
async fn load_form(session: &Session) -> Result<(String, Vec<String>), RequestError> {
    let me = api::fetch_me(session).await?;
    let dogs = api::fetch_my_dogs(session).await?;
    Ok((me.username, dogs.into_iter().map(|d| d.name).collect()))
}

/// Availability form
#[component]
pub fn SetAvailability() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let owner_username = create_rw_signal(String::new());
    let dog_names = create_rw_signal(Vec::<String>::new());

    let dog = create_rw_signal(String::new());
    let place = create_rw_signal(String::new());
    let start = create_rw_signal(String::new());
    let end = create_rw_signal(String::new());

    // Fetch the owner and their dogs on mount
    create_effect(move |_| {
        let Some(session) = state.session() else {
            log_error("No session token; log in first");
            return;
        };
        spawn_local(async move {
            match load_form(&session).await {
                Ok((username, names)) => {
                    owner_username.set(username);
                    dog_names.set(names);
                }
                Err(e) => log_error(&format!("Failed to load availability form: {}", e)),
            }
        });
    });

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();

        let Some(session) = state.session() else {
            alert("Error setting availability");
            return;
        };

        let (start_time, end_time) = match (
            schedule::to_utc_timestamp(&start.get_untracked()),
            schedule::to_utc_timestamp(&end.get_untracked()),
        ) {
            (Ok(start_time), Ok(end_time)) => (start_time, end_time),
            (Err(e), _) | (_, Err(e)) => {
                log_error(&e.to_string());
                alert("Error setting availability");
                return;
            }
        };

        let payload = NewAvailability {
            owner_username: owner_username.get_untracked(),
            dog: dog.get_untracked(),
            place_name: place.get_untracked(),
            start_time,
            end_time,
        };

        state.loading.set(true);
        spawn_local(async move {
            match api::create_availability(&session, &payload).await {
                Ok(_) => {
                    log_info(&format!("Availability set for {}", payload.dog));
                    alert("Availability set!");
                }
                Err(e) => {
                    log_error(&format!("Failed to set availability: {}", e));
                    alert("Error setting availability");
                }
            }
            state.loading.set(false);
        });
    };

    let dog_options = Signal::derive(move || {
        dog_names
            .get()
            .into_iter()
            .map(|name| (name.clone(), name))
            .collect::<Vec<_>>()
    });

    view! {
        <FormCard title="Set Availability">
            <form on:submit=on_submit class="space-y-4">
                <SelectField
                    label="Select Dog"
                    value=dog
                    placeholder="-- Choose a dog --"
                    options=dog_options
                />
                <TextField label="Place" value=place />
                <TextField label="Start Time" value=start input_type="datetime-local" />
                <TextField label="End Time" value=end input_type="datetime-local" />
                <SubmitButton label="Submit Availability" busy=state.loading />
            </form>
        </FormCard>
    }
}
