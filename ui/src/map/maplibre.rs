//! Bindings to the global `maplibregl` object and a [`MapEngine`] over them.

use geojson::FeatureCollection;
use serde::Serialize;
use serde_json::{json, Value};
use stac_common::geo::{BBox, LngLat};
use stac_common::map::{FillLayer, MapEngine, FOOTPRINT_LAYER};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[wasm_bindgen(js_namespace = maplibregl)]
extern "C" {
    #[derive(Clone)]
    pub type Map;

    #[wasm_bindgen(constructor, catch)]
    fn new(options: &JsValue) -> Result<Map, JsValue>;

    #[wasm_bindgen(method)]
    fn once(this: &Map, event: &str, handler: &JsValue);

    #[wasm_bindgen(method, js_name = addSource)]
    fn add_source(this: &Map, id: &str, source: &JsValue);

    #[wasm_bindgen(method, js_name = getSource)]
    fn get_source(this: &Map, id: &str) -> JsValue;

    #[wasm_bindgen(method, js_name = removeSource)]
    fn remove_source(this: &Map, id: &str);

    #[wasm_bindgen(method, js_name = addLayer)]
    fn add_layer(this: &Map, layer: &JsValue);

    #[wasm_bindgen(method, js_name = addLayer)]
    fn add_layer_before(this: &Map, layer: &JsValue, before_id: &str);

    #[wasm_bindgen(method, js_name = getLayer)]
    fn get_layer(this: &Map, id: &str) -> JsValue;

    #[wasm_bindgen(method, js_name = removeLayer)]
    fn remove_layer(this: &Map, id: &str);

    #[wasm_bindgen(method, js_name = setFilter)]
    fn set_filter(this: &Map, layer: &str, filter: &JsValue);

    #[wasm_bindgen(method, js_name = flyTo)]
    fn fly_to(this: &Map, options: &JsValue);

    #[wasm_bindgen(method, js_name = fitBounds)]
    fn fit_bounds(this: &Map, bounds: &JsValue, options: &JsValue);

    #[wasm_bindgen(method, js_name = getBounds)]
    fn get_bounds(this: &Map) -> LngLatBounds;

    #[wasm_bindgen(method)]
    fn remove(this: &Map);

    type GeoJSONSource;

    #[wasm_bindgen(method, js_name = setData)]
    fn set_data(this: &GeoJSONSource, data: &JsValue);

    type LngLatBounds;

    #[wasm_bindgen(method, js_name = getWest)]
    fn get_west(this: &LngLatBounds) -> f64;

    #[wasm_bindgen(method, js_name = getSouth)]
    fn get_south(this: &LngLatBounds) -> f64;

    #[wasm_bindgen(method, js_name = getEast)]
    fn get_east(this: &LngLatBounds) -> f64;

    #[wasm_bindgen(method, js_name = getNorth)]
    fn get_north(this: &LngLatBounds) -> f64;

    type Marker;

    #[wasm_bindgen(constructor)]
    fn new() -> Marker;

    #[wasm_bindgen(method, js_name = setLngLat)]
    fn set_lng_lat(this: &Marker, lng_lat: &JsValue) -> Marker;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &Marker, map: &Map) -> Marker;

    #[wasm_bindgen(method, js_name = getElement)]
    fn get_element(this: &Marker) -> web_sys::HtmlElement;

    #[wasm_bindgen(method, js_name = remove)]
    fn remove_marker(this: &Marker);
}

/// OpenStreetMap raster basemap.
fn basemap_style() -> Value {
    json!({
        "version": 8,
        "sources": {
            "osm": {
                "type": "raster",
                "tiles": ["https://tile.openstreetmap.org/{z}/{x}/{y}.png"],
                "tileSize": 256,
                "attribution": "&copy; OpenStreetMap contributors"
            }
        },
        "layers": [{ "id": "osm", "type": "raster", "source": "osm" }]
    })
}

const INITIAL_CENTER: [f64; 2] = [0.0, 20.0];
const INITIAL_ZOOM: f64 = 2.0;

/// Create a map in the element with id `container`. `on_load` runs once the
/// style is ready and sources may be added.
pub fn mount(container: &str, on_load: impl FnOnce(Map) + 'static) -> Result<Map, JsValue> {
    let window = web_sys::window().ok_or(JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or(JsValue::from_str("no document"))?;
    if document.get_element_by_id(container).is_none() {
        return Err(JsValue::from_str(&format!(
            "map container #{} not found",
            container
        )));
    }
    if !js_sys::Reflect::has(&window, &JsValue::from_str("maplibregl"))? {
        return Err(JsValue::from_str("maplibregl is not loaded"));
    }

    let options = to_js(&json!({
        "container": container,
        "style": basemap_style(),
        "center": INITIAL_CENTER,
        "zoom": INITIAL_ZOOM,
    }));
    let map = Map::new(&options)?;
    let handle = map.clone();
    map.once("load", &Closure::once_into_js(move || on_load(handle)));
    Ok(map)
}

pub fn destroy(map: &Map) {
    map.remove();
}

/// Current viewport as a bounding box.
pub fn visible_bounds(map: &Map) -> BBox {
    let bounds = map.get_bounds();
    BBox::new(
        bounds.get_west(),
        bounds.get_south(),
        bounds.get_east(),
        bounds.get_north(),
    )
}

/// A marker plus the click handler it keeps alive.
pub struct MarkerHandle {
    marker: Marker,
    _on_click: Closure<dyn FnMut()>,
}

pub struct MapLibreEngine {
    map: Map,
}

impl MapLibreEngine {
    pub fn new(map: Map) -> Self {
        Self { map }
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    fn has_layer(&self, id: &str) -> bool {
        !self.map.get_layer(id).is_undefined()
    }

    fn has_source(&self, id: &str) -> bool {
        !self.map.get_source(id).is_undefined()
    }

    /// Add a raster source over `tiles` (possibly none) and its layer, kept
    /// under the footprints.
    fn install_raster(&mut self, source: &str, layer: &str, tiles: &[&str]) {
        self.map.add_source(
            source,
            &to_js(&json!({
                "type": "raster",
                "tiles": tiles,
                "tileSize": 256,
            })),
        );
        let definition = to_js(&json!({ "id": layer, "type": "raster", "source": source }));
        if self.has_layer(FOOTPRINT_LAYER) {
            self.map.add_layer_before(&definition, FOOTPRINT_LAYER);
        } else {
            self.map.add_layer(&definition);
        }
    }
}

impl MapEngine for MapLibreEngine {
    type Marker = MarkerHandle;

    fn add_vector_source(&mut self, id: &str) {
        self.map.add_source(
            id,
            &to_js(&json!({
                "type": "geojson",
                "data": { "type": "FeatureCollection", "features": [] }
            })),
        );
    }

    fn add_fill_layer(&mut self, layer: &FillLayer) {
        let mut definition = json!({
            "id": layer.id,
            "type": "fill",
            "source": layer.source,
            "paint": {
                "fill-color": layer.color,
                "fill-opacity": layer.opacity,
            }
        });
        if let Some(filter) = &layer.filter {
            definition["filter"] = filter.clone();
        }
        self.map.add_layer(&to_js(&definition));
    }

    fn set_source_data(&mut self, source: &str, data: &FeatureCollection) {
        let found = self.map.get_source(source);
        if found.is_undefined() {
            tracing::warn!("Map source {} missing", source);
            return;
        }
        found
            .unchecked_into::<GeoJSONSource>()
            .set_data(&to_js(data));
    }

    fn set_layer_filter(&mut self, layer: &str, filter: &Value) {
        self.map.set_filter(layer, &to_js(filter));
    }

    fn add_raster_source(&mut self, source: &str, layer: &str) {
        self.install_raster(source, layer, &[]);
    }

    fn set_raster_tiles(&mut self, source: &str, layer: &str, tiles: Option<&str>) {
        if self.has_layer(layer) {
            self.map.remove_layer(layer);
        }
        if self.has_source(source) {
            self.map.remove_source(source);
        }
        let tiles: Vec<&str> = tiles.into_iter().collect();
        self.install_raster(source, layer, &tiles);
    }

    fn add_marker(&mut self, at: LngLat, on_click: Box<dyn FnMut()>) -> MarkerHandle {
        let marker = Marker::new();
        marker.set_lng_lat(&to_js(&[at.lng, at.lat]));
        let on_click = Closure::wrap(on_click);
        if let Err(e) = marker
            .get_element()
            .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
        {
            tracing::error!("Failed to attach marker click handler: {:?}", e);
        }
        marker.add_to(&self.map);
        MarkerHandle {
            marker,
            _on_click: on_click,
        }
    }

    fn remove_marker(&mut self, handle: MarkerHandle) {
        handle.marker.remove_marker();
    }

    fn fly_to(&mut self, at: LngLat, zoom: f64) {
        self.map
            .fly_to(&to_js(&json!({ "center": [at.lng, at.lat], "zoom": zoom })));
    }

    fn fit_bounds(&mut self, bbox: BBox, padding: f64, max_zoom: f64) {
        self.map.fit_bounds(
            &to_js(&[[bbox.west, bbox.south], [bbox.east, bbox.north]]),
            &to_js(&json!({ "padding": padding, "maxZoom": max_zoom })),
        );
    }
}

/// Serialize through JSON so MapLibre receives plain objects.
fn to_js<T: Serialize + ?Sized>(value: &T) -> JsValue {
    match serde_json::to_string(value) {
        Ok(text) => js_sys::JSON::parse(&text).unwrap_or_else(|e| {
            tracing::error!("JSON.parse failed: {:?}", e);
            JsValue::NULL
        }),
        Err(e) => {
            tracing::error!("Failed to serialize map value: {}", e);
            JsValue::NULL
        }
    }
}
