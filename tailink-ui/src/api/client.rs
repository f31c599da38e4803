//! HTTP API Client
//!
//! Functions for calling the Tailink REST API with `gloo-net`.

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::fmt;
use tailink::routes::endpoints;
use tailink::{
    ApiErrorBody, Availability, Credentials, CurrentUser, Dog, FormBody, LoginResponse,
    NewAvailability, Place, Session,
};

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api/";

/// localStorage key of the API base URL override
const API_URL_KEY: &str = "tailink_api_url";

/// localStorage key of the MapTiler key override
const MAPTILER_KEY: &str = "tailink_maptiler_key";

fn storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let url = storage()
        .and_then(|s| s.get_item(API_URL_KEY).ok().flatten())
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    // Endpoint paths are joined directly, so keep exactly one trailing slash
    format!("{}/", url.trim_end_matches('/'))
}

/// MapTiler key: local storage first, then the one compiled in
pub fn get_maptiler_key() -> String {
    storage()
        .and_then(|s| s.get_item(MAPTILER_KEY).ok().flatten())
        .or_else(|| option_env!("TAILINK_MAPTILER_KEY").map(str::to_string))
        .unwrap_or_default()
}

fn url(path: &str) -> String {
    format!("{}{}", get_api_base(), path)
}

// ============ Errors ============

/// Why a request failed
#[derive(Debug, Clone, PartialEq)]
pub enum RequestError {
    /// The request never got a response
    Network(String),
    /// Non-success status, with the server's first error message
    Api { status: u16, message: String },
    /// Success status with an unreadable body
    Parse(String),
}

impl RequestError {
    /// Server-provided message, if the server rejected the request
    pub fn api_message(&self) -> Option<&str> {
        match self {
            RequestError::Api { message, .. } => Some(message),
            _ => None,
        }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::Network(e) => write!(f, "Network error: {}", e),
            RequestError::Api { status, message } => write!(f, "HTTP {}: {}", status, message),
            RequestError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

// ============ Helpers ============

fn authorized(builder: RequestBuilder, session: Option<&Session>) -> RequestBuilder {
    match session {
        Some(session) => builder.header("Authorization", &session.authorization()),
        None => builder,
    }
}

async fn check(response: Response) -> Result<Response, RequestError> {
    if response.ok() {
        return Ok(response);
    }

    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let message = ApiErrorBody::from_text(&text).first_message();
    web_sys::console::error_1(&format!("HTTP {} from {}: {}", status, response.url(), text).into());
    Err(RequestError::Api { status, message })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, RequestError> {
    check(response)
        .await?
        .json()
        .await
        .map_err(|e| RequestError::Parse(e.to_string()))
}

fn network(e: gloo_net::Error) -> RequestError {
    RequestError::Network(e.to_string())
}

/// Multipart body from the shared form description plus an optional browser file
fn form_data(
    form: &FormBody,
    file: Option<(&str, &web_sys::File)>,
) -> Result<web_sys::FormData, RequestError> {
    let to_err = |e: wasm_bindgen::JsValue| RequestError::Network(format!("{:?}", e));

    let data = web_sys::FormData::new().map_err(to_err)?;
    for (name, value) in &form.fields {
        data.append_with_str(name, value).map_err(to_err)?;
    }
    if let Some((name, file)) = file {
        data.append_with_blob_and_filename(name, file, &file.name())
            .map_err(to_err)?;
    }
    Ok(data)
}

// ============ API Functions ============

/// Exchange credentials for a token
pub async fn login(credentials: &Credentials) -> Result<LoginResponse, RequestError> {
    let response = Request::post(&url(endpoints::LOGIN))
        .json(credentials)
        .map_err(network)?
        .send()
        .await
        .map_err(network)?;

    read_json(response).await
}

/// Create an account from the merged registration form
pub async fn register(
    form: &FormBody,
    picture: Option<&web_sys::File>,
) -> Result<(), RequestError> {
    let body = form_data(form, picture.map(|f| (tailink::model::PICTURE_FIELD, f)))?;

    let response = Request::post(&url(endpoints::REGISTER))
        .body(body)
        .map_err(network)?
        .send()
        .await
        .map_err(network)?;

    check(response).await?;
    Ok(())
}

/// Add a dog to the logged-in owner
pub async fn create_dog(
    session: &Session,
    form: &FormBody,
    picture: Option<&web_sys::File>,
) -> Result<Dog, RequestError> {
    let body = form_data(form, picture.map(|f| (tailink::model::PICTURE_FIELD, f)))?;

    let response = authorized(Request::post(&url(endpoints::MY_DOGS)), Some(session))
        .body(body)
        .map_err(network)?
        .send()
        .await
        .map_err(network)?;

    read_json(response).await
}

/// Dogs owned by the logged-in owner
pub async fn fetch_my_dogs(session: &Session) -> Result<Vec<Dog>, RequestError> {
    let response = authorized(Request::get(&url(endpoints::MY_DOGS)), Some(session))
        .send()
        .await
        .map_err(network)?;

    read_json(response).await
}

/// The logged-in user
pub async fn fetch_me(session: &Session) -> Result<CurrentUser, RequestError> {
    let response = authorized(Request::get(&url(endpoints::ME)), Some(session))
        .send()
        .await
        .map_err(network)?;

    read_json(response).await
}

/// Publish an availability window
pub async fn create_availability(
    session: &Session,
    availability: &NewAvailability,
) -> Result<Availability, RequestError> {
    let response = authorized(Request::post(&url(endpoints::AVAILABILITY)), Some(session))
        .json(availability)
        .map_err(network)?
        .send()
        .await
        .map_err(network)?;

    read_json(response).await
}

async fn fetch_places(session: Option<&Session>) -> Result<Vec<Place>, RequestError> {
    let response = authorized(Request::get(&url(endpoints::PLACES)), session)
        .send()
        .await
        .map_err(network)?;
    read_json(response).await
}

async fn fetch_availabilities(
    session: Option<&Session>,
) -> Result<Vec<Availability>, RequestError> {
    let response = authorized(Request::get(&url(endpoints::AVAILABILITY)), session)
        .send()
        .await
        .map_err(network)?;
    read_json(response).await
}

async fn fetch_dogs(session: Option<&Session>) -> Result<Vec<Dog>, RequestError> {
    let response = authorized(Request::get(&url(endpoints::DOGS)), session)
        .send()
        .await
        .map_err(network)?;
    read_json(response).await
}

/// Everything the map needs, fetched in parallel. Any failure fails the whole load.
pub async fn fetch_map_data(
    session: Option<&Session>,
) -> Result<(Vec<Place>, Vec<Availability>, Vec<Dog>), RequestError> {
    futures::try_join!(
        fetch_places(session),
        fetch_availabilities(session),
        fetch_dogs(session),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_api_errors_carry_a_server_message() {
        let api = RequestError::Api {
            status: 400,
            message: "Unable to log in with provided credentials.".to_string(),
        };
        assert_eq!(api.api_message(), Some("Unable to log in with provided credentials."));
        assert_eq!(RequestError::Network("refused".to_string()).api_message(), None);
    }

    #[test]
    fn test_error_display() {
        let err = RequestError::Api { status: 401, message: "nope".to_string() };
        assert_eq!(err.to_string(), "HTTP 401: nope");
        assert_eq!(RequestError::Parse("eof".to_string()).to_string(), "Parse error: eof");
    }
}
