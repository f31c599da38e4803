//! UI Components
//!
//! Reusable Leptos components for the pages.

pub mod field;
pub mod map_view;
pub mod nav;

pub use field::{
    selected_file, FileField, FormCard, SelectField, SubmitButton, TextArea, TextField,
};
pub use map_view::MapView;
pub use nav::Nav;
