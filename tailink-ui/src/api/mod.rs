//! API Layer
//!
//! HTTP access to the Tailink REST API from the browser.

pub mod client;

pub use client::*;
