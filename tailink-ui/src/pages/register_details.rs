//! Register Details Page
//!
//! Step 2 of registration: profile fields. Submits both steps as one
//! multipart request, then sends the user to login.

use leptos::*;
use leptos_router::*;
use tailink::{AppRoute, Gender, ProfileDetails};

use crate::api::{self, RequestError};
use crate::components::{
    selected_file, FileField, FormCard, SelectField, SubmitButton, TextArea, TextField,
};
use crate::state::global::{alert, log_error, log_info, GlobalState};

/// Profile step of registration
#[component]
pub fn RegisterDetails() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let navigate = use_navigate();

    let first_name = create_rw_signal(String::new());
    let last_name = create_rw_signal(String::new());
    let gender = create_rw_signal(String::new());
    let age = create_rw_signal(String::new());
    let city = create_rw_signal(String::new());
    let about_me = create_rw_signal(String::new());
    let picture = create_node_ref::<html::Input>();

    let gender_options: Vec<(String, String)> = Gender::ALL
        .iter()
        .map(|g| (g.as_str().to_string(), g.label().to_string()))
        .collect();

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let navigate = navigate.clone();

        let Some(draft) = state.draft() else {
            alert("Please fill in your account details first");
            navigate(AppRoute::Register.path(), Default::default());
            return;
        };

        let gender = match gender.get_untracked().parse::<Gender>() {
            Ok(gender) => gender,
            Err(e) => {
                alert(&e.to_string());
                return;
            }
        };

        let form = draft.into_form(ProfileDetails {
            first_name: first_name.get_untracked(),
            last_name: last_name.get_untracked(),
            gender,
            age: age.get_untracked(),
            city: city.get_untracked(),
            about_me: about_me.get_untracked(),
            picture: None,
        });
        let file = selected_file(picture);

        state.loading.set(true);
        spawn_local(async move {
            match api::register(&form, file.as_ref()).await {
                Ok(()) => {
                    log_info("Registered successfully");
                    state.clear_draft();
                    navigate(AppRoute::Login.path(), Default::default());
                }
                Err(RequestError::Api { message, .. }) => {
                    log_error(&format!("Register failed: {}", message));
                    alert(&format!("Register failed: {}", message));
                }
                Err(e) => {
                    log_error(&format!("Register failed: {}", e));
                    alert("Failed to register");
                }
            }
            state.loading.set(false);
        });
    };

    view! {
        <FormCard title="🐾 Complete your profile">
            <form on:submit=on_submit class="space-y-4">
                <TextField label="First Name" value=first_name />
                <TextField label="Last Name" value=last_name />
                <SelectField
                    label="Gender"
                    value=gender
                    placeholder="Select your gender"
                    options=gender_options
                />
                <TextField label="Age" value=age input_type="number" />
                <TextField label="City" value=city />
                <TextArea
                    label="About Me"
                    value=about_me
                    rows=4
                    placeholder="Tell us a bit about yourself"
                />
                <FileField label="Profile Picture" input_ref=picture />
                <SubmitButton label="Complete Registration" busy=state.loading />
            </form>
        </FormCard>
    }
}
