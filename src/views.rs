//! View Workflows
//!
//! What each client view does when submitted: which requests it sends, what
//! it stores, and where it navigates. Failures come back as [`ClientError`];
//! callers show [`ClientError::alert`] for the view and stay put.

use async_trait::async_trait;
use futures_util::future::join_all;

use crate::client::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::map::{self, Marker};
use crate::model::{
    Credentials, Dog, NewAvailability, NewDog, ProfileDetails, RegistrationDraft, Session,
};
use crate::routes::AppRoute;
use crate::schedule;
use crate::session::SessionStore;

/// What the user sees after a successful submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Alert shown before navigating
    pub notice: Option<&'static str>,
    /// Route to navigate to; `None` stays on the page
    pub to: Option<AppRoute>,
}

impl Transition {
    fn navigate(to: AppRoute) -> Self {
        Self { notice: None, to: Some(to) }
    }
}

/// Data the availability form needs before it can be submitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityForm {
    pub owner_username: String,
    pub dog_names: Vec<String>,
}

/// Raw availability input as typed into the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityInput {
    pub dog: String,
    pub place: String,
    /// `datetime-local` style, interpreted in local time
    pub start: String,
    pub end: String,
}

/// Decides whether a marker photo loads
#[async_trait]
pub trait PhotoProbe: Send + Sync {
    async fn loads(&self, url: &str) -> bool;
}

/// Treats every photo URL as loadable
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeLoaded;

#[async_trait]
impl PhotoProbe for AssumeLoaded {
    async fn loads(&self, _url: &str) -> bool {
        true
    }
}

#[async_trait]
impl PhotoProbe for ApiClient {
    async fn loads(&self, url: &str) -> bool {
        match self.fetch_photo(url).await {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!("Photo {} did not load: {}", url, e);
                false
            }
        }
    }
}

/// Register step 1: forward the account fields to step 2. No network.
pub fn register_account(
    username: impl Into<String>,
    email: impl Into<String>,
    password: impl Into<String>,
) -> (RegistrationDraft, AppRoute) {
    (
        RegistrationDraft::new(username, email, password),
        AppRoute::RegisterDetails,
    )
}

/// The client's views bound to an API client and a session store
pub struct Tailink<S> {
    client: ApiClient,
    session: S,
}

impl<S: SessionStore> Tailink<S> {
    pub fn new(client: ApiClient, session: S) -> Self {
        Self { client, session }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    fn require_token(&self) -> ClientResult<String> {
        self.session.token()?.ok_or(ClientError::Unauthenticated)
    }

    /// Log in, store the token and go to `/dogs`
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<Transition> {
        let credentials = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };

        let response = self.client.login(&credentials).await?;
        self.session.save(&Session::new(response.token))?;

        tracing::info!(username = %username, "Logged in");
        Ok(Transition::navigate(AppRoute::Dogs))
    }

    /// Forget the stored token
    pub fn logout(&self) -> ClientResult<()> {
        self.session.clear()?;
        tracing::info!("Logged out");
        Ok(())
    }

    /// Register step 2: submit account and profile fields together, then go to `/login`
    pub async fn complete_registration(
        &self,
        draft: Option<RegistrationDraft>,
        details: ProfileDetails,
    ) -> ClientResult<Transition> {
        let draft = draft.ok_or(ClientError::MissingDraft)?;
        let username = draft.username.clone();

        self.client.register(draft.into_form(details)).await?;

        tracing::info!(username = %username, "Registration complete");
        Ok(Transition::navigate(AppRoute::Login))
    }

    /// Add a dog and go to `/set-availability`
    pub async fn add_dog(&self, dog: &NewDog) -> ClientResult<Transition> {
        let token = self.require_token()?;
        let created = self.client.create_dog(&token, dog.to_form()).await?;

        tracing::info!(dog = %created.name, "Dog added");
        Ok(Transition {
            notice: Some("Dog added successfully!"),
            to: Some(AppRoute::SetAvailability),
        })
    }

    /// Dogs owned by the logged-in user
    pub async fn my_dogs(&self) -> ClientResult<Vec<Dog>> {
        let token = self.require_token()?;
        self.client.my_dogs(&token).await
    }

    /// Fetch the current user, then their dogs
    pub async fn load_availability_form(&self) -> ClientResult<AvailabilityForm> {
        let token = self.require_token()?;

        let me = self.client.me(&token).await?;
        let dogs = self.client.my_dogs(&token).await?;

        Ok(AvailabilityForm {
            owner_username: me.username,
            dog_names: dogs.into_iter().map(|d| d.name).collect(),
        })
    }

    /// Publish an availability window for one of the owner's dogs
    pub async fn set_availability(
        &self,
        form: &AvailabilityForm,
        input: &AvailabilityInput,
    ) -> ClientResult<Transition> {
        let token = self.require_token()?;

        if !form.dog_names.iter().any(|name| name == &input.dog) {
            // The server resolves dogs by name, so this still goes through
            tracing::warn!(dog = %input.dog, "Dog is not in the owner's list");
        }

        let payload = NewAvailability {
            owner_username: form.owner_username.clone(),
            dog: input.dog.clone(),
            place_name: input.place.clone(),
            start_time: schedule::to_utc_timestamp(&input.start)?,
            end_time: schedule::to_utc_timestamp(&input.end)?,
        };

        self.client.create_availability(&token, &payload).await?;

        tracing::info!(dog = %payload.dog, place = %payload.place_name, "Availability set");
        Ok(Transition {
            notice: Some("Availability set!"),
            to: None,
        })
    }

    /// Fetch places, availabilities and dogs in parallel and build the
    /// markers whose photos load
    pub async fn load_map<P: PhotoProbe + ?Sized>(&self, probe: &P) -> ClientResult<Vec<Marker>> {
        let token = self.session.token()?;
        let token = token.as_deref();

        let (places, availabilities, dogs) = tokio::try_join!(
            self.client.places(token),
            self.client.availabilities(token),
            self.client.dogs(token),
        )?;

        tracing::debug!(
            places = places.len(),
            availabilities = availabilities.len(),
            dogs = dogs.len(),
            "Map data loaded"
        );

        let candidates = map::build_markers(&places, &availabilities, &dogs);
        Ok(placed_markers(candidates, probe).await)
    }
}

/// Keep the markers whose photo loads, in their original order
pub async fn placed_markers<P: PhotoProbe + ?Sized>(
    candidates: Vec<Marker>,
    probe: &P,
) -> Vec<Marker> {
    let checks = candidates.iter().map(|marker| async move {
        match marker.photo_url.as_deref() {
            Some(url) => probe.loads(url).await,
            None => false,
        }
    });
    let loaded = join_all(checks).await;

    let total = candidates.len();
    let placed: Vec<Marker> = candidates
        .into_iter()
        .zip(loaded)
        .filter_map(|(marker, ok)| ok.then_some(marker))
        .collect();

    if placed.len() < total {
        tracing::debug!("Dropped {} markers without a loadable photo", total - placed.len());
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{LngLat, Popup};

    struct OnlyPng;

    #[async_trait]
    impl PhotoProbe for OnlyPng {
        async fn loads(&self, url: &str) -> bool {
            url.ends_with(".png")
        }
    }

    fn marker(dog: &str, photo: Option<&str>) -> Marker {
        Marker {
            position: LngLat { lng: 1.0, lat: 2.0 },
            dog: dog.to_string(),
            photo_url: photo.map(str::to_string),
            popup: Popup {
                dog: dog.to_string(),
                from: String::new(),
                to: String::new(),
                owner: String::new(),
                place: String::new(),
            },
        }
    }

    #[test]
    fn test_register_account_is_local() {
        let (draft, next) = register_account("dana", "d@x.io", "pw");
        assert_eq!(next, AppRoute::RegisterDetails);
        assert_eq!(draft.email, "d@x.io");
    }

    #[tokio::test]
    async fn test_markers_without_loading_photo_are_dropped() {
        let candidates = vec![
            marker("Rex", Some("/rex.png")),
            marker("Bo", Some("/bo.gif")),
            marker("Ziggy", None),
            marker("Luna", Some("/luna.png")),
        ];

        let placed = placed_markers(candidates, &OnlyPng).await;
        let dogs: Vec<_> = placed.iter().map(|m| m.dog.as_str()).collect();
        assert_eq!(dogs, vec!["Rex", "Luna"]);
    }

    #[tokio::test]
    async fn test_assume_loaded_keeps_every_photo() {
        let candidates = vec![marker("Rex", Some("/rex.jpg")), marker("Bo", None)];
        let placed = placed_markers(candidates, &AssumeLoaded).await;
        assert_eq!(placed.len(), 1);
    }
}
