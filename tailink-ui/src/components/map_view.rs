//! Map Component
//!
//! MapLibre map of dog availability. Each marker shows the dog's photo and is
//! only placed once that photo has loaded.

use leptos::*;
use tailink::map::{
    self, Marker, DEFAULT_CENTER, DEFAULT_ZOOM, POPUP_OFFSET, RTL_TEXT_PLUGIN_URL,
};
use tailink::Session;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::api;
use crate::state::global::{alert, log_error, log_info, GlobalState};

const MARKER_STYLE: &str = "width: 40px; height: 40px; border-radius: 50%; overflow: hidden; \
     display: flex; align-items: center; justify-content: center;";

const PHOTO_STYLE: &str =
    "width: 100%; height: 100%; border-radius: 50%; object-fit: cover; display: block;";

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = maplibregl, js_name = Map)]
    #[derive(Debug, Clone)]
    type GlMap;

    #[wasm_bindgen(constructor, js_namespace = maplibregl, js_class = "Map")]
    fn new(options: &js_sys::Object) -> GlMap;

    #[wasm_bindgen(method, js_name = addControl)]
    fn add_control(this: &GlMap, control: &NavigationControl, position: &str);

    #[wasm_bindgen(method)]
    fn on(this: &GlMap, event: &str, listener: &js_sys::Function);

    #[wasm_bindgen(method)]
    fn remove(this: &GlMap);

    #[wasm_bindgen(method, js_name = hasImage)]
    fn has_image(this: &GlMap, id: &str) -> bool;

    #[wasm_bindgen(method, js_name = addImage)]
    fn add_image(this: &GlMap, id: &str, image: &js_sys::Object);

    #[wasm_bindgen(method, js_name = getStyle)]
    fn get_style(this: &GlMap) -> JsValue;

    #[wasm_bindgen(method, catch, js_name = removeLayer)]
    fn remove_layer(this: &GlMap, id: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = maplibregl, js_name = setRTLTextPlugin)]
    fn set_rtl_text_plugin(url: &str, callback: &JsValue, lazy: bool) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = maplibregl, js_name = getRTLTextPluginStatus)]
    fn rtl_text_plugin_status() -> Result<String, JsValue>;

    #[wasm_bindgen(js_namespace = maplibregl)]
    type NavigationControl;

    #[wasm_bindgen(constructor, js_namespace = maplibregl)]
    fn new() -> NavigationControl;

    #[wasm_bindgen(js_namespace = maplibregl, js_name = Marker)]
    type GlMarker;

    #[wasm_bindgen(constructor, js_namespace = maplibregl, js_class = "Marker")]
    fn new(options: &js_sys::Object) -> GlMarker;

    #[wasm_bindgen(method, js_name = setLngLat)]
    fn set_lng_lat(this: &GlMarker, lng_lat: &js_sys::Array) -> GlMarker;

    #[wasm_bindgen(method, js_name = setPopup)]
    fn set_popup(this: &GlMarker, popup: &GlPopup) -> GlMarker;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &GlMarker, map: &GlMap) -> GlMarker;

    #[wasm_bindgen(js_namespace = maplibregl, js_name = Popup)]
    type GlPopup;

    #[wasm_bindgen(constructor, js_namespace = maplibregl, js_class = "Popup")]
    fn new(options: &js_sys::Object) -> GlPopup;

    #[wasm_bindgen(method, js_name = setHTML)]
    fn set_html(this: &GlPopup, html: &str) -> GlPopup;
}

/// Map of every placeable availability
#[component]
pub fn MapView() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let container = create_node_ref::<html::Div>();
    let handle = store_value(None::<GlMap>);

    // Create the map once the container is mounted
    create_effect(move |_| {
        let Some(div) = container.get() else {
            return;
        };
        if handle.with_value(Option::is_some) {
            return;
        }
        let gl = create_map(&div, state.session());
        handle.set_value(Some(gl));
    });

    on_cleanup(move || {
        handle.update_value(|gl| {
            if let Some(gl) = gl.take() {
                gl.remove();
            }
        });
    });

    view! {
        <div
            node_ref=container
            class="w-full rounded-xl overflow-hidden shadow"
            style="height: 70vh"
        />
    }
}

fn options(entries: &[(&str, JsValue)]) -> js_sys::Object {
    let object = js_sys::Object::new();
    for (key, value) in entries {
        let _ = js_sys::Reflect::set(&object, &JsValue::from_str(key), value);
    }
    object
}

fn lng_lat(lng: f64, lat: f64) -> js_sys::Array {
    js_sys::Array::of2(&lng.into(), &lat.into())
}

fn create_map(container: &web_sys::HtmlDivElement, session: Option<Session>) -> GlMap {
    register_rtl_plugin();

    let gl = GlMap::new(&options(&[
        ("container", container.clone().into()),
        ("style", map::style_url(&api::get_maptiler_key()).into()),
        ("center", lng_lat(DEFAULT_CENTER[0], DEFAULT_CENTER[1]).into()),
        ("zoom", DEFAULT_ZOOM.into()),
    ]));
    gl.add_control(&NavigationControl::new(), "top-right");
    patch_missing_images(&gl);
    strip_office_symbols(&gl);

    let loaded_map = gl.clone();
    let on_load = Closure::wrap(Box::new(move |_: JsValue| {
        log_info("Map loaded");
        let gl = loaded_map.clone();
        let session = session.clone();
        spawn_local(async move {
            load_markers(&gl, session.as_ref()).await;
        });
    }) as Box<dyn FnMut(JsValue)>);
    gl.on("load", on_load.as_ref().unchecked_ref());
    on_load.forget();

    gl
}

/// The plugin can only be set once per page
fn register_rtl_plugin() {
    if matches!(rtl_text_plugin_status().as_deref(), Ok("unavailable")) {
        if let Err(e) = set_rtl_text_plugin(RTL_TEXT_PLUGIN_URL, &JsValue::NULL, true) {
            log_error(&format!("Failed to register RTL text plugin: {:?}", e));
        }
    }
}

/// Fill icons the style references but does not ship with a transparent pixel
fn patch_missing_images(gl: &GlMap) {
    let target = gl.clone();
    let on_missing = Closure::wrap(Box::new(move |event: JsValue| {
        let Some(id) = js_sys::Reflect::get(&event, &JsValue::from_str("id"))
            .ok()
            .and_then(|id| id.as_string())
        else {
            return;
        };
        if target.has_image(&id) {
            return;
        }
        let pixel = options(&[
            ("width", JsValue::from_f64(1.0)),
            ("height", JsValue::from_f64(1.0)),
            ("data", js_sys::Uint8Array::new_with_length(4).into()),
        ]);
        target.add_image(&id, &pixel);
    }) as Box<dyn FnMut(JsValue)>);
    gl.on("styleimagemissing", on_missing.as_ref().unchecked_ref());
    on_missing.forget();
}

fn strip_office_symbols(gl: &GlMap) {
    let target = gl.clone();
    let on_style = Closure::wrap(Box::new(move |_: JsValue| {
        let style = target.get_style();
        let Ok(layers) = js_sys::Reflect::get(&style, &JsValue::from_str("layers")) else {
            return;
        };
        if !js_sys::Array::is_array(&layers) {
            return;
        }

        for layer in js_sys::Array::from(&layers).iter() {
            let field = |obj: &JsValue, key: &str| {
                js_sys::Reflect::get(obj, &JsValue::from_str(key))
                    .ok()
                    .and_then(|v| v.as_string())
            };
            let layout = js_sys::Reflect::get(&layer, &JsValue::from_str("layout"))
                .unwrap_or(JsValue::UNDEFINED);
            let layer_type = field(&layer, "type").unwrap_or_default();
            let icon = if layout.is_object() {
                field(&layout, "icon-image")
            } else {
                None
            };

            if !map::is_office_symbol(&layer_type, icon.as_deref()) {
                continue;
            }
            if let Some(id) = field(&layer, "id") {
                if let Err(e) = target.remove_layer(&id) {
                    log_error(&format!("Couldn't remove layer {}: {:?}", id, e));
                }
            }
        }
    }) as Box<dyn FnMut(JsValue)>);
    gl.on("style.load", on_style.as_ref().unchecked_ref());
    on_style.forget();
}

async fn load_markers(gl: &GlMap, session: Option<&Session>) {
    let (places, availabilities, dogs) = match api::fetch_map_data(session).await {
        Ok(data) => data,
        Err(e) => {
            log_error(&format!("Failed to load place or availability data: {}", e));
            alert("Failed to load place or availability data");
            return;
        }
    };

    log_info(&format!(
        "Loaded {} places, {} availabilities, {} dogs",
        places.len(),
        availabilities.len(),
        dogs.len()
    ));

    for marker in map::build_markers(&places, &availabilities, &dogs) {
        if let Err(e) = place_when_loaded(gl, marker) {
            log_error(&format!("Failed to create marker: {:?}", e));
        }
    }
}

/// Load the marker's photo and place the marker from its onload handler.
/// A photo that never loads leaves the marker off the map.
fn place_when_loaded(gl: &GlMap, marker: Marker) -> Result<(), JsValue> {
    let Some(photo_url) = marker.photo_url.clone() else {
        return Ok(());
    };

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let element = document.create_element("div")?;
    element.set_attribute("style", MARKER_STYLE)?;

    let image: web_sys::HtmlImageElement = document.create_element("img")?.dyn_into()?;
    image.set_attribute("style", PHOTO_STYLE)?;
    image.set_alt(&marker.dog);

    let gl = gl.clone();
    let photo = image.clone();
    let on_load = Closure::wrap(Box::new(move |_: JsValue| {
        if element.append_child(&photo).is_err() {
            return;
        }
        let popup = GlPopup::new(&options(&[("offset", POPUP_OFFSET.into())]))
            .set_html(&marker.popup.to_html());
        GlMarker::new(&options(&[("element", element.clone().into())]))
            .set_lng_lat(&lng_lat(marker.position.lng, marker.position.lat))
            .set_popup(&popup)
            .add_to(&gl);
    }) as Box<dyn FnMut(JsValue)>);
    image.set_onload(Some(on_load.as_ref().unchecked_ref()));
    on_load.forget();

    image.set_src(&photo_url);
    Ok(())
}
