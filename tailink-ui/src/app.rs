//! App Root Component
//!
//! Routing and global providers.

use leptos::*;
use leptos_router::*;
use tailink::AppRoute;

use crate::api;
use crate::components::Nav;
use crate::pages::{AddDog, Login, Map, Register, RegisterDetails, SetAvailability};
use crate::state::global::{log_info, provide_global_state};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    provide_global_state();
    log_info(&format!("Using API at {}", api::get_api_base()));

    view! {
        <Router>
            <div class="min-h-screen bg-gray-100 flex flex-col">
                <Nav />

                <main class="flex-1">
                    <Routes>
                        <Route path=AppRoute::Landing.path() view=Landing />
                        <Route path=AppRoute::Login.path() view=Login />
                        <Route path=AppRoute::Register.path() view=Register />
                        <Route path=AppRoute::RegisterDetails.path() view=RegisterDetails />
                        <Route path=AppRoute::Dogs.path() view=AddDog />
                        <Route path=AppRoute::SetAvailability.path() view=SetAvailability />
                        <Route path=AppRoute::Map.path() view=Map />
                        <Route path="/*any" view=NotFound />
                    </Routes>
                </main>
            </div>
        </Router>
    }
}

/// `/` only forwards
#[component]
fn Landing() -> impl IntoView {
    let target = AppRoute::Landing.redirect().unwrap_or(AppRoute::Login);
    view! { <Redirect path=target.path() /> }
}

/// 404 Not Found page
#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center min-h-[60vh] text-center">
            <div class="text-6xl mb-4">"🐾"</div>
            <h1 class="text-3xl font-bold mb-2">"Page Not Found"</h1>
            <p class="text-gray-500 mb-6">"The page you're looking for doesn't exist."</p>
            <A
                href=AppRoute::Login.path()
                class="px-6 py-3 bg-blue-500 hover:bg-blue-600 text-white rounded-xl font-medium transition"
            >
                "Go to Login"
            </A>
        </div>
    }
}
