//! Tailink REST API Client
//!
//! HTTP client for the endpoints the views call. Authenticated calls send
//! `Authorization: Token <token>`.

use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::error::{ClientError, ClientResult};
use crate::model::{
    authorization_header, ApiErrorBody, Availability, Credentials, CurrentUser, Dog, FormBody,
    LoginResponse, NewAvailability, Place,
};
use crate::routes::endpoints;

/// Tailink REST API client
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the configured API
    pub fn new(config: &ApiConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.normalized_base_url(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Exchange credentials for a token
    pub async fn login(&self, credentials: &Credentials) -> ClientResult<LoginResponse> {
        tracing::debug!(username = %credentials.username, "Logging in");
        let request = self.client.post(self.url(endpoints::LOGIN)).json(credentials);
        read_json(send(request).await?).await
    }

    /// Create an account from the merged registration form
    pub async fn register(&self, form: FormBody) -> ClientResult<()> {
        let request = self
            .client
            .post(self.url(endpoints::REGISTER))
            .multipart(multipart(form)?);
        let response = check(send(request).await?).await?;
        tracing::info!(status = response.status().as_u16(), "Registered account");
        Ok(())
    }

    /// Add a dog to the logged-in owner
    pub async fn create_dog(&self, token: &str, form: FormBody) -> ClientResult<Dog> {
        let request = self
            .client
            .post(self.url(endpoints::MY_DOGS))
            .header(AUTHORIZATION, authorization_header(token))
            .multipart(multipart(form)?);
        read_json(send(request).await?).await
    }

    /// Dogs owned by the logged-in owner
    pub async fn my_dogs(&self, token: &str) -> ClientResult<Vec<Dog>> {
        let request = self
            .client
            .get(self.url(endpoints::MY_DOGS))
            .header(AUTHORIZATION, authorization_header(token));
        read_json(send(request).await?).await
    }

    /// The logged-in user
    pub async fn me(&self, token: &str) -> ClientResult<CurrentUser> {
        let request = self
            .client
            .get(self.url(endpoints::ME))
            .header(AUTHORIZATION, authorization_header(token));
        read_json(send(request).await?).await
    }

    /// Publish an availability window
    pub async fn create_availability(
        &self,
        token: &str,
        availability: &NewAvailability,
    ) -> ClientResult<Availability> {
        let request = self
            .client
            .post(self.url(endpoints::AVAILABILITY))
            .header(AUTHORIZATION, authorization_header(token))
            .json(availability);
        read_json(send(request).await?).await
    }

    /// All places
    pub async fn places(&self, token: Option<&str>) -> ClientResult<Vec<Place>> {
        let request = with_token(self.client.get(self.url(endpoints::PLACES)), token);
        read_json(send(request).await?).await
    }

    /// All availabilities
    pub async fn availabilities(&self, token: Option<&str>) -> ClientResult<Vec<Availability>> {
        let request = with_token(self.client.get(self.url(endpoints::AVAILABILITY)), token);
        read_json(send(request).await?).await
    }

    /// All dogs, for the map's photo lookup
    pub async fn dogs(&self, token: Option<&str>) -> ClientResult<Vec<Dog>> {
        let request = with_token(self.client.get(self.url(endpoints::DOGS)), token);
        read_json(send(request).await?).await
    }

    /// Fetch a photo and check that it came back as a successful response.
    ///
    /// Relative URLs resolve against the API origin.
    pub async fn fetch_photo(&self, url: &str) -> ClientResult<()> {
        let url = self.resolve(url);
        let request = self.client.get(&url);
        let response = check(send(request).await?).await?;
        response.bytes().await?;
        Ok(())
    }

    fn resolve(&self, url: &str) -> String {
        match reqwest::Url::parse(&self.base_url).and_then(|base| base.join(url)) {
            Ok(resolved) => resolved.to_string(),
            Err(_) => url.to_string(),
        }
    }
}

fn with_token(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.header(AUTHORIZATION, authorization_header(token)),
        None => request,
    }
}

async fn send(request: RequestBuilder) -> ClientResult<Response> {
    request.send().await.map_err(|e| {
        tracing::warn!("Request failed: {}", e);
        ClientError::Network(e)
    })
}

/// Turn a non-success status into [`ClientError::Api`]
async fn check(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().clone();
    let text = response.text().await.unwrap_or_default();
    let message = ApiErrorBody::from_text(&text).first_message();

    tracing::warn!(
        status = status.as_u16(),
        url = %url,
        error_message = %message,
        "API request rejected"
    );

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let response = check(response).await?;
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
}

fn multipart(body: FormBody) -> ClientResult<Form> {
    let mut form = body
        .fields
        .into_iter()
        .fold(Form::new(), |form, (name, value)| form.text(name, value));

    if let Some((name, picture)) = body.file {
        let picture_name = picture.file_name.clone();
        let part = Part::bytes(picture.bytes)
            .file_name(picture.file_name)
            .mime_str(&picture.mime)
            .map_err(|_| {
                ClientError::InvalidInput(format!(
                    "{}: unsupported picture type {:?}",
                    picture_name, picture.mime
                ))
            })?;
        form = form.part(name, part);
    }

    Ok(form)
}
