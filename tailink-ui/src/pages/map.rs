//! Map Page
//!
//! Everyone's dog availability on a map.

use leptos::*;

use crate::components::MapView;

/// Availability map page
#[component]
pub fn Map() -> impl IntoView {
    view! {
        <div class="container mx-auto px-4 py-6 space-y-4">
            <div>
                <h1 class="text-3xl font-bold">"Dogs Nearby"</h1>
                <p class="text-gray-500 mt-1">"Tap a dog to see when and where it is available"</p>
            </div>
            <MapView />
        </div>
    }
}
