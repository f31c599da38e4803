//! Domain Model
//!
//! Client-side mirrors of the records served by the Tailink REST API, and the
//! request payloads the views submit. Nothing here is persisted except the
//! [`Session`] token.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fallback message when an error response carries nothing readable
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Multipart field name for uploaded pictures
pub const PICTURE_FIELD: &str = "picture";

// ============ Session & Auth ============

/// Authenticated session issued at login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }

    /// Value for the `Authorization` header
    pub fn authorization(&self) -> String {
        authorization_header(&self.token)
    }
}

/// Format a token the way the API expects it
pub fn authorization_header(token: &str) -> String {
    format!("Token {}", token)
}

/// Login request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Response from `owner/login/`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Response from `owner/auth/me/`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurrentUser {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

// ============ Registration ============

/// Account fields collected by register step 1.
///
/// Carried to step 2 in memory and dropped once step 2 submits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationDraft {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegistrationDraft {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Merge the account fields with the profile fields into one multipart body
    pub fn into_form(self, details: ProfileDetails) -> FormBody {
        let mut form = FormBody::new()
            .text("username", self.username)
            .text("email", self.email)
            .text("password", self.password)
            .text("first_name", details.first_name)
            .text("last_name", details.last_name)
            .text("gender", details.gender.as_str())
            .text("age", details.age)
            .text("city", details.city)
            .text("about_me", details.about_me);

        if let Some(picture) = details.picture {
            form = form.file(PICTURE_FIELD, picture);
        }

        form
    }
}

/// Profile fields collected by register step 2
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDetails {
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub age: String,
    pub city: String,
    pub about_me: String,
    pub picture: Option<Picture>,
}

/// Gender choices offered at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
    PreferNotToSay,
}

impl Gender {
    pub const ALL: [Gender; 4] = [
        Gender::Male,
        Gender::Female,
        Gender::Other,
        Gender::PreferNotToSay,
    ];

    /// Wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
            Gender::PreferNotToSay => "prefer_not_to_say",
        }
    }

    /// Human readable label for select boxes
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
            Gender::PreferNotToSay => "Prefer not to say",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized gender value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown gender {0:?} (expected male, female, other or prefer_not_to_say)")]
pub struct UnknownGender(pub String);

impl FromStr for Gender {
    type Err = UnknownGender;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Gender::ALL
            .into_iter()
            .find(|g| g.as_str() == normalized)
            .ok_or_else(|| UnknownGender(s.to_string()))
    }
}

// ============ Multipart Bodies ============

/// An image attached to a form
#[derive(Clone, PartialEq, Eq)]
pub struct Picture {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl Picture {
    /// Create a picture, guessing the MIME type from the file extension
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = mime_for(&file_name).to_string();
        Self {
            file_name,
            mime,
            bytes,
        }
    }

    /// Read a picture from disk
    #[cfg(feature = "native")]
    pub fn from_path(path: &std::path::Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "picture".to_string());
        Ok(Self::new(file_name, bytes))
    }
}

impl fmt::Debug for Picture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Picture")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

fn mime_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// A multipart body as ordered text fields plus at most one file.
///
/// Both the native client and the browser build their transport-specific
/// form from this, so field names live in one place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormBody {
    pub fields: Vec<(&'static str, String)>,
    pub file: Option<(&'static str, Picture)>,
}

impl FormBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.fields.push((name, value.into()));
        self
    }

    pub fn file(mut self, name: &'static str, picture: Picture) -> Self {
        self.file = Some((name, picture));
        self
    }

    /// Look up a text field
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }
}

// ============ Dogs ============

/// A dog profile as submitted by the dog-profile view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDog {
    pub name: String,
    pub breed: String,
    /// Sent as typed; the server validates it
    pub age: String,
    pub about: String,
    pub picture: Option<Picture>,
}

impl NewDog {
    pub fn to_form(&self) -> FormBody {
        let form = FormBody::new()
            .text("name", self.name.clone())
            .text("breed", self.breed.clone())
            .text("age", self.age.clone())
            .text("about", self.about.clone());

        match &self.picture {
            Some(picture) => form.file(PICTURE_FIELD, picture.clone()),
            None => form,
        }
    }
}

/// A dog record from the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dog {
    pub name: String,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub about: Option<String>,
    /// Picture URL
    #[serde(default)]
    pub picture: Option<String>,
}

// ============ Availability ============

/// Availability submission. The dog is referenced by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAvailability {
    pub owner_username: String,
    pub dog: String,
    pub place_name: String,
    /// UTC RFC 3339
    pub start_time: String,
    /// UTC RFC 3339
    pub end_time: String,
}

/// An availability record from the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Availability {
    #[serde(default)]
    pub owner_username: String,
    pub dog: String,
    #[serde(default)]
    pub place_name: String,
    #[serde(default)]
    pub place_id: Option<RecordId>,
    pub start_time: String,
    pub end_time: String,
}

// ============ Places ============

/// A place record from the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "deserialize_coordinate")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_coordinate")]
    pub longitude: Option<f64>,
}

impl Place {
    /// `[longitude, latitude]` when both coordinates are present
    pub fn lng_lat(&self) -> Option<(f64, f64)> {
        Some((self.longitude?, self.latitude?))
    }
}

/// Coordinates arrive as numbers, decimal strings, empty strings or null
fn deserialize_coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite()))
}

/// Record identifier compared loosely, so `1` and `"1"` are the same id
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        RecordId(id.to_string())
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        RecordId(id.trim().to_string())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Number(n) => Ok(RecordId(n.to_string())),
            serde_json::Value::String(s) => Ok(RecordId::from(s.as_str())),
            other => Err(serde::de::Error::custom(format!(
                "expected a number or string id, got {}",
                other
            ))),
        }
    }
}

// ============ Error Bodies ============

/// Error body returned by the API on a non-success status.
///
/// Either field errors (`{"username": ["..."]}`), `non_field_errors`, a
/// `detail` string, or a bare list of messages.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub non_field_errors: Vec<String>,
    #[serde(default)]
    pub detail: Option<String>,
    /// Field errors in the order the server sent them
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl ApiErrorBody {
    /// Parse a response body, falling back to an empty body
    pub fn from_text(text: &str) -> Self {
        match serde_json::from_str::<serde_json::Value>(text) {
            Ok(serde_json::Value::Array(items)) => Self {
                non_field_errors: items.iter().filter_map(message_of).collect(),
                ..Self::default()
            },
            Ok(value @ serde_json::Value::Object(_)) => {
                serde_json::from_value(value).unwrap_or_default()
            }
            _ => Self::default(),
        }
    }

    /// The message shown to the user
    pub fn first_message(&self) -> String {
        if let Some(msg) = self.non_field_errors.first() {
            return msg.clone();
        }
        if let Some(detail) = &self.detail {
            return detail.clone();
        }
        self.fields
            .iter()
            .find_map(|(field, value)| message_of(value).map(|msg| format!("{}: {}", field, msg)))
            .unwrap_or_else(|| UNKNOWN_ERROR.to_string())
    }
}

fn message_of(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Array(items) => items.iter().find_map(message_of),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> ProfileDetails {
        ProfileDetails {
            first_name: "Dana".to_string(),
            last_name: "Levi".to_string(),
            gender: Gender::PreferNotToSay,
            age: "31".to_string(),
            city: "Herzliya".to_string(),
            about_me: "Walks every morning".to_string(),
            picture: None,
        }
    }

    #[test]
    fn test_registration_form_merges_both_steps() {
        let draft = RegistrationDraft::new("dana", "dana@example.com", "pw");
        let form = draft.into_form(details());

        assert_eq!(form.field("username"), Some("dana"));
        assert_eq!(form.field("email"), Some("dana@example.com"));
        assert_eq!(form.field("password"), Some("pw"));
        assert_eq!(form.field("first_name"), Some("Dana"));
        assert_eq!(form.field("gender"), Some("prefer_not_to_say"));
        assert_eq!(form.field("about_me"), Some("Walks every morning"));
        assert!(form.file.is_none());
    }

    #[test]
    fn test_registration_form_attaches_picture() {
        let mut profile = details();
        profile.picture = Some(Picture::new("me.JPG", vec![1, 2, 3]));

        let form = RegistrationDraft::new("dana", "d@x.io", "pw").into_form(profile);
        let (name, picture) = form.file.expect("picture attached");
        assert_eq!(name, PICTURE_FIELD);
        assert_eq!(picture.mime, "image/jpeg");
    }

    #[test]
    fn test_dog_form_sends_age_as_text() {
        let dog = NewDog {
            name: "Rex".to_string(),
            breed: "Beagle".to_string(),
            age: "three".to_string(),
            about: "Loud".to_string(),
            picture: None,
        };
        let form = dog.to_form();
        assert_eq!(form.field("age"), Some("three"));
        assert_eq!(form.fields.len(), 4);
    }

    #[test]
    fn test_gender_parse() {
        assert_eq!("male".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!("Prefer not to say".parse::<Gender>().unwrap(), Gender::PreferNotToSay);
        assert_eq!("prefer-not-to-say".parse::<Gender>().unwrap(), Gender::PreferNotToSay);
        assert!("robot".parse::<Gender>().is_err());
    }

    #[test]
    fn test_place_coordinates_lenient() {
        let places: Vec<Place> = serde_json::from_str(
            r#"[
                {"id": 1, "name": "Park", "latitude": "32.195000", "longitude": "34.860000"},
                {"id": 2, "name": "Beach", "latitude": 32.1, "longitude": 34.8},
                {"id": 3, "name": "Nowhere", "latitude": null, "longitude": ""},
                {"id": 4, "name": "Bare"}
            ]"#,
        )
        .unwrap();

        assert_eq!(places[0].lng_lat(), Some((34.86, 32.195)));
        assert_eq!(places[1].lng_lat(), Some((34.8, 32.1)));
        assert_eq!(places[2].lng_lat(), None);
        assert_eq!(places[3].lng_lat(), None);
    }

    #[test]
    fn test_record_id_loose_equality() {
        let a: RecordId = serde_json::from_str("1").unwrap();
        let b: RecordId = serde_json::from_str("\"1\"").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, RecordId::from(1));
        assert!(serde_json::from_str::<RecordId>("true").is_err());
    }

    #[test]
    fn test_error_message_precedence() {
        let body = ApiErrorBody::from_text(
            r#"{"non_field_errors": ["Unable to log in"], "detail": "ignored"}"#,
        );
        assert_eq!(body.first_message(), "Unable to log in");

        let body = ApiErrorBody::from_text(r#"{"detail": "Invalid token."}"#);
        assert_eq!(body.first_message(), "Invalid token.");

        let body = ApiErrorBody::from_text(r#"{"username": ["This field is required."]}"#);
        assert_eq!(body.first_message(), "username: This field is required.");

        let body = ApiErrorBody::from_text(r#"["Owner profile not found for this user."]"#);
        assert_eq!(body.first_message(), "Owner profile not found for this user.");
    }

    #[test]
    fn test_error_message_takes_first_field_sent() {
        let body = ApiErrorBody::from_text(
            r#"{
                "username": ["A user with that username already exists."],
                "age": ["A valid integer is required."]
            }"#,
        );
        assert_eq!(
            body.first_message(),
            "username: A user with that username already exists."
        );
    }

    #[test]
    fn test_error_message_fallback() {
        assert_eq!(ApiErrorBody::from_text("<html>502</html>").first_message(), UNKNOWN_ERROR);
        assert_eq!(ApiErrorBody::from_text("{}").first_message(), UNKNOWN_ERROR);
    }

    #[test]
    fn test_availability_payload_shape() {
        let payload = NewAvailability {
            owner_username: "alice".to_string(),
            dog: "Rex".to_string(),
            place_name: "Park".to_string(),
            start_time: "2025-05-01T07:00:00.000Z".to_string(),
            end_time: "2025-05-01T08:00:00.000Z".to_string(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["owner_username"], "alice");
        assert_eq!(json["dog"], "Rex");
        assert_eq!(json["place_name"], "Park");
        assert_eq!(json.as_object().unwrap().len(), 5);
    }
}
