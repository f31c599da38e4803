//! Availability Map
//!
//! Joins places, availabilities and dogs into the markers the map view
//! places. Shared by the CLI and the browser UI; rendering and photo
//! loading are left to the caller.

use serde::Serialize;
use std::collections::HashMap;

use crate::model::{Availability, Dog, Place};
use crate::schedule;

/// Initial map center as `[longitude, latitude]`
pub const DEFAULT_CENTER: [f64; 2] = [34.860, 32.195];

/// Initial zoom level
pub const DEFAULT_ZOOM: f64 = 14.0;

/// Pixel offset of marker popups
pub const POPUP_OFFSET: u32 = 25;

/// MapTiler streets style for a given API key
pub fn style_url(maptiler_key: &str) -> String {
    format!(
        "https://api.maptiler.com/maps/streets-v2/style.json?key={}",
        maptiler_key
    )
}

/// Right-to-left text shaping plugin, so Hebrew labels render correctly
pub const RTL_TEXT_PLUGIN_URL: &str =
    "https://api.mapbox.com/mapbox-gl-js/plugins/mapbox-gl-rtl-text/v0.2.3/mapbox-gl-rtl-text.js";

/// Symbol layers whose `office*` icons the streets style fails to ship.
/// These are removed once the style loads.
pub fn is_office_symbol(layer_type: &str, icon_image: Option<&str>) -> bool {
    layer_type == "symbol" && icon_image.is_some_and(|icon| icon.starts_with("office"))
}

/// Map position
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub fn to_array(self) -> [f64; 2] {
        [self.lng, self.lat]
    }
}

/// A place with coordinates and the availabilities scheduled there
#[derive(Debug, Clone)]
pub struct PlaceAvailabilities<'a> {
    pub place: &'a Place,
    pub position: LngLat,
    pub availabilities: Vec<&'a Availability>,
}

/// Popup content for one marker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
    pub dog: String,
    pub from: String,
    pub to: String,
    pub owner: String,
    pub place: String,
}

impl Popup {
    fn for_availability(availability: &Availability, format: impl Fn(&str) -> String) -> Self {
        Self {
            dog: availability.dog.clone(),
            from: format(&availability.start_time),
            to: format(&availability.end_time),
            owner: availability.owner_username.clone(),
            place: availability.place_name.clone(),
        }
    }

    /// Lines as shown to the user
    pub fn lines(&self) -> [String; 5] {
        [
            self.dog.clone(),
            format!("From: {}", self.from),
            format!("To: {}", self.to),
            format!("Owner: {}", self.owner),
            format!("Place: {}", self.place),
        ]
    }

    /// Popup body for the map widget, with all values escaped
    pub fn to_html(&self) -> String {
        format!(
            "<strong>{}</strong><br>From: {}<br>To: {}<br>Owner: {}<br>Place: {}",
            escape_html(&self.dog),
            escape_html(&self.from),
            escape_html(&self.to),
            escape_html(&self.owner),
            escape_html(&self.place),
        )
    }
}

/// One marker per (place, availability) pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub position: LngLat,
    pub dog: String,
    /// The marker is only placed once this loads
    pub photo_url: Option<String>,
    pub popup: Popup,
}

/// Dog name to picture URL. Later dogs with the same name win.
pub fn photo_index(dogs: &[Dog]) -> HashMap<&str, Option<&str>> {
    dogs.iter()
        .map(|dog| (dog.name.as_str(), dog.picture.as_deref()))
        .collect()
}

/// Attach availabilities to the places they reference.
///
/// Places without both coordinates are dropped. Each availability lands on
/// every place whose id matches its `place_id` and on no other.
pub fn join<'a>(
    places: &'a [Place],
    availabilities: &'a [Availability],
) -> Vec<PlaceAvailabilities<'a>> {
    places
        .iter()
        .filter_map(|place| {
            let (lng, lat) = place.lng_lat()?;
            Some(PlaceAvailabilities {
                place,
                position: LngLat { lng, lat },
                availabilities: availabilities
                    .iter()
                    .filter(|a| a.place_id.as_ref() == Some(&place.id))
                    .collect(),
            })
        })
        .collect()
}

/// Build every candidate marker, formatting times in local time
pub fn build_markers(
    places: &[Place],
    availabilities: &[Availability],
    dogs: &[Dog],
) -> Vec<Marker> {
    build_markers_with(places, availabilities, dogs, schedule::format_local)
}

/// Build every candidate marker with a custom time formatter
pub fn build_markers_with(
    places: &[Place],
    availabilities: &[Availability],
    dogs: &[Dog],
    format_time: impl Fn(&str) -> String,
) -> Vec<Marker> {
    let photos = photo_index(dogs);

    join(places, availabilities)
        .into_iter()
        .flat_map(|entry| {
            let photos = &photos;
            let format_time = &format_time;
            entry.availabilities.into_iter().map(move |a| Marker {
                position: entry.position,
                dog: a.dog.clone(),
                photo_url: photos
                    .get(a.dog.as_str())
                    .copied()
                    .flatten()
                    .filter(|url| !url.is_empty())
                    .map(str::to_string),
                popup: Popup::for_availability(a, format_time),
            })
        })
        .collect()
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RecordId;

    fn place(id: i64, lat: Option<f64>, lon: Option<f64>) -> Place {
        Place {
            id: RecordId::from(id),
            name: format!("place-{}", id),
            address: None,
            latitude: lat,
            longitude: lon,
        }
    }

    fn availability(place_id: i64, dog: &str) -> Availability {
        Availability {
            owner_username: "alice".to_string(),
            dog: dog.to_string(),
            place_name: format!("place-{}", place_id),
            place_id: Some(RecordId::from(place_id)),
            start_time: "2025-05-01T07:00:00Z".to_string(),
            end_time: "2025-05-01T08:00:00Z".to_string(),
        }
    }

    fn dog(name: &str, picture: Option<&str>) -> Dog {
        Dog {
            name: name.to_string(),
            breed: None,
            age: None,
            about: None,
            picture: picture.map(str::to_string),
        }
    }

    #[test]
    fn test_join_attaches_to_matching_place_only() {
        let places = vec![place(1, Some(10.0), Some(20.0)), place(2, Some(11.0), Some(21.0))];
        let availabilities = vec![availability(1, "Rex")];

        let joined = join(&places, &availabilities);

        assert_eq!(joined.len(), 2);
        assert_eq!(joined[0].place.id, RecordId::from(1));
        assert_eq!(joined[0].availabilities.len(), 1);
        assert_eq!(joined[0].availabilities[0].dog, "Rex");
        assert_eq!(joined[0].position, LngLat { lng: 20.0, lat: 10.0 });
        assert!(joined[1].availabilities.is_empty());
    }

    #[test]
    fn test_join_drops_places_without_coordinates() {
        let places = vec![
            place(1, None, Some(20.0)),
            place(2, Some(11.0), None),
            place(3, Some(1.0), Some(2.0)),
        ];
        let availabilities = vec![availability(1, "Rex"), availability(3, "Bo")];

        let joined = join(&places, &availabilities);

        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].place.id, RecordId::from(3));
    }

    #[test]
    fn test_join_matches_string_ids() {
        let places: Vec<Place> = serde_json::from_str(
            r#"[{"id": "7", "name": "Park", "latitude": 1, "longitude": 2}]"#,
        )
        .unwrap();
        let availabilities: Vec<Availability> = serde_json::from_str(
            r#"[{"dog": "Rex", "place_id": 7, "start_time": "a", "end_time": "b"}]"#,
        )
        .unwrap();

        assert_eq!(join(&places, &availabilities)[0].availabilities.len(), 1);
    }

    #[test]
    fn test_office_symbols_only() {
        assert!(is_office_symbol("symbol", Some("office_11")));
        assert!(!is_office_symbol("symbol", Some("park_11")));
        assert!(!is_office_symbol("symbol", None));
        assert!(!is_office_symbol("line", Some("office_11")));
    }

    #[test]
    fn test_photo_index_last_wins() {
        let dogs = vec![dog("Rex", Some("/a.png")), dog("Rex", Some("/b.png")), dog("Bo", None)];
        let index = photo_index(&dogs);

        assert_eq!(index.get("Rex"), Some(&Some("/b.png")));
        assert_eq!(index.get("Bo"), Some(&None));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_one_marker_per_availability() {
        let places = vec![place(1, Some(10.0), Some(20.0)), place(2, None, None)];
        let availabilities = vec![
            availability(1, "Rex"),
            availability(1, "Bo"),
            availability(2, "Rex"),
        ];
        let dogs = vec![dog("Rex", Some("/rex.png")), dog("Bo", Some(""))];

        let markers = build_markers_with(&places, &availabilities, &dogs, |t| t.to_string());

        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].photo_url.as_deref(), Some("/rex.png"));
        assert_eq!(markers[1].photo_url, None);
        assert_eq!(markers[0].popup.from, "2025-05-01T07:00:00Z");
        assert_eq!(markers[0].popup.owner, "alice");
    }

    #[test]
    fn test_popup_html_escapes() {
        let popup = Popup {
            dog: "<b>Rex</b>".to_string(),
            from: "a".to_string(),
            to: "b".to_string(),
            owner: "o'neil".to_string(),
            place: "Park & Ride".to_string(),
        };
        let html = popup.to_html();

        assert!(html.starts_with("<strong>&lt;b&gt;Rex&lt;/b&gt;</strong>"));
        assert!(html.contains("Owner: o&#39;neil"));
        assert!(html.contains("Place: Park &amp; Ride"));
        assert_eq!(popup.lines()[1], "From: a");
    }
}
