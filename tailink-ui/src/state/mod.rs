//! State Management
//!
//! Global application state and browser token storage.

pub mod global;
pub mod session;

pub use global::GlobalState;
