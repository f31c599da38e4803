//! Navigation Component
//!
//! Header bar with the view links and logout.

use leptos::*;
use leptos_router::*;
use tailink::AppRoute;

use crate::state::GlobalState;

/// Navigation header component
#[component]
pub fn Nav() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let logged_in = state.logged_in;
    let navigate = use_navigate();

    let on_logout = move |_| {
        state.logout();
        navigate(AppRoute::Login.path(), Default::default());
    };

    view! {
        <nav class="bg-white border-b border-gray-200">
            <div class="container mx-auto px-4">
                <div class="flex items-center justify-between h-14">
                    <A href=AppRoute::Map.path() class="flex items-center space-x-2">
                        <span class="text-2xl">"🐶"</span>
                        <span class="text-xl font-bold">"Tailink"</span>
                    </A>

                    <div class="flex items-center space-x-1">
                        <NavLink route=AppRoute::Map label="Map" />
                        {move || if logged_in.get() {
                            view! {
                                <NavLink route=AppRoute::Dogs label="Add Dog" />
                                <NavLink route=AppRoute::SetAvailability label="Availability" />
                                <button
                                    on:click=on_logout.clone()
                                    class="px-3 py-2 rounded-lg text-gray-600 hover:bg-gray-100"
                                >
                                    "Logout"
                                </button>
                            }.into_view()
                        } else {
                            view! {
                                <NavLink route=AppRoute::Login label="Login" />
                                <NavLink route=AppRoute::Register label="Register" />
                            }.into_view()
                        }}
                    </div>
                </div>
            </div>
        </nav>
    }
}

/// Individual navigation link
#[component]
fn NavLink(route: AppRoute, label: &'static str) -> impl IntoView {
    view! {
        <A
            href=route.path()
            class="px-3 py-2 rounded-lg text-gray-600 hover:bg-gray-100"
            active_class="bg-gray-100 text-gray-900"
        >
            {label}
        </A>
    }
}
