//! # Tailink
//!
//! Client for a dog-walking coordination service: owners register, add their
//! dogs, publish when and where a dog is available, and browse everyone's
//! availability on a map. All business logic lives in the Tailink REST API;
//! this crate is the client side of it.
//!
//! ## Modules
//!
//! - [`model`]: records and request payloads
//! - [`routes`]: client URL paths
//! - [`session`]: token storage
//! - [`schedule`]: availability timestamp conversion
//! - [`map`]: place/availability join and marker building
//! - [`client`]: REST client (`native` feature)
//! - [`views`]: the view workflows (`native` feature)
//! - [`config`]: TOML configuration (`native` feature)
//!
//! With default features off, only the platform-independent modules build,
//! which is what the browser UI uses.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tailink::{ApiClient, ApiConfig, MemorySessionStore, Tailink};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new(&ApiConfig::new("http://localhost:8000/api/"))?;
//!     let app = Tailink::new(client, MemorySessionStore::new());
//!
//!     let next = app.login("alice", "secret").await?;
//!     println!("Logged in, next stop: {:?}", next.to);
//!
//!     let form = app.load_availability_form().await?;
//!     println!("{} can schedule {:?}", form.owner_username, form.dog_names);
//!
//!     Ok(())
//! }
//! ```

pub mod map;
pub mod model;
pub mod routes;
pub mod schedule;
pub mod session;

#[cfg(feature = "native")]
pub mod client;
#[cfg(feature = "native")]
pub mod config;
#[cfg(feature = "native")]
pub mod error;
#[cfg(feature = "native")]
pub mod views;

pub use map::{LngLat, Marker, PlaceAvailabilities, Popup};

pub use model::{
    ApiErrorBody, Availability, Credentials, CurrentUser, Dog, FormBody, Gender, LoginResponse,
    NewAvailability, NewDog, Picture, Place, ProfileDetails, RecordId, RegistrationDraft, Session,
};

pub use routes::AppRoute;

pub use schedule::TimestampError;

pub use session::{MemorySessionStore, SessionError, SessionStore};

#[cfg(feature = "native")]
pub use session::FileSessionStore;

#[cfg(feature = "native")]
pub use client::ApiClient;

#[cfg(feature = "native")]
pub use config::{
    ApiConfig, Config, ConfigError, LoadedConfig, LoggingConfig, MapConfig, SessionConfig,
};

#[cfg(feature = "native")]
pub use error::{ClientError, ClientResult};

#[cfg(feature = "native")]
pub use views::{
    register_account, AssumeLoaded, AvailabilityForm, AvailabilityInput, PhotoProbe, Tailink,
    Transition,
};
