//! Register Page
//!
//! Step 1 of registration: collects the account fields and hands them to
//! step 2. Nothing is sent yet.

use leptos::*;
use leptos_router::*;
use tailink::{AppRoute, RegistrationDraft};

use crate::components::{FormCard, SubmitButton, TextField};
use crate::state::GlobalState;

/// Account step of registration
#[component]
pub fn Register() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let navigate = use_navigate();

    let username = create_rw_signal(String::new());
    let email = create_rw_signal(String::new());
    let password = create_rw_signal(String::new());

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();

        state.registration_draft.set(Some(RegistrationDraft::new(
            username.get_untracked(),
            email.get_untracked(),
            password.get_untracked(),
        )));
        navigate(AppRoute::RegisterDetails.path(), Default::default());
    };

    view! {
        <FormCard title="🐶 Create your account">
            <form on:submit=on_submit class="space-y-4">
                <TextField label="Username" value=username />
                <TextField label="Email" value=email input_type="email" />
                <TextField label="Password" value=password input_type="password" />
                <SubmitButton label="Register" busy=false />
            </form>
            <p class="text-center text-sm mt-4">
                "Already have an account? "
                <A href=AppRoute::Login.path() class="text-blue-500 hover:underline">
                    "Login"
                </A>
            </p>
        </FormCard>
    }
}
