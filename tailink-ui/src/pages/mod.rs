//! Pages
//!
//! Top-level page components for each route.

pub mod add_dog;
pub mod login;
pub mod map;
pub mod register;
pub mod register_details;
pub mod set_availability;

pub use add_dog::AddDog;
pub use login::Login;
pub use map::Map;
pub use register::Register;
pub use register_details::RegisterDetails;
pub use set_availability::SetAvailability;
