//! Login Page
//!
//! Exchanges credentials for a token, stores it and moves on to the dogs page.

use leptos::*;
use leptos_router::*;
use tailink::{AppRoute, Credentials, Session};

use crate::api;
use crate::components::{FormCard, SubmitButton, TextField};
use crate::state::global::{alert, log_error, log_info, GlobalState};

/// Login page
#[component]
pub fn Login() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let navigate = use_navigate();

    let username = create_rw_signal(String::new());
    let password = create_rw_signal(String::new());

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();

        let credentials = Credentials {
            username: username.get_untracked(),
            password: password.get_untracked(),
        };
        let navigate = navigate.clone();

        state.loading.set(true);
        spawn_local(async move {
            match api::login(&credentials).await {
                Ok(response) => {
                    log_info(&format!("Logged in as {}", credentials.username));
                    state.store_session(&Session::new(response.token));
                    navigate(AppRoute::Dogs.path(), Default::default());
                }
                Err(e) => {
                    log_error(&format!("Login failed: {}", e));
                    match e.api_message() {
                        Some(message) => alert(&format!("Login failed: {}", message)),
                        None => alert("Something went wrong. Please try again."),
                    }
                }
            }
            state.loading.set(false);
        });
    };

    view! {
        <FormCard title="🐶 Tailink">
            <form on:submit=on_submit class="space-y-4">
                <TextField label="Username" value=username />
                <TextField label="Password" value=password input_type="password" />
                <SubmitButton
                    label="Login"
                    busy=state.loading
                    color="bg-blue-500 hover:bg-blue-600"
                />
            </form>
            <p class="text-center text-sm mt-4">
                "Don't have an account? "
                <A href=AppRoute::Register.path() class="text-blue-500 hover:underline">
                    "Register"
                </A>
            </p>
        </FormCard>
    }
}
