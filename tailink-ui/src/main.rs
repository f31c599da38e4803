//! Tailink Web
//!
//! Browser client for Tailink built with Leptos (WASM).
//!
//! # Features
//!
//! - Login and two-step registration
//! - Dog profiles with photo upload
//! - Availability scheduling
//! - Availability map with dog photo markers
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. Records, routes and the map join come from the `tailink`
//! library built without its native stack; requests go through `gloo-net`.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
