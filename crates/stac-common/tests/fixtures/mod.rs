use std::cell::RefCell;
use std::future::Future;
use std::pin::pin;
use std::rc::Rc;
use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

use geojson::FeatureCollection;
use serde_json::{json, Value};
use stac_common::geo::{BBox, LngLat};
use stac_common::map::{FillLayer, MapEngine};
use stac_common::types::{Item, ItemCollection};

/// A STAC item with a square polygon footprint spanning `[w, s]`..`[e, n]`.
#[allow(dead_code)]
pub fn polygon_item(id: &str, w: f64, s: f64, e: f64, n: f64) -> Item {
    item_from(json!({
        "type": "Feature",
        "id": id,
        "collection": "c1",
        "geometry": {
            "type": "Polygon",
            "coordinates": [[[w, s], [e, s], [e, n], [w, n], [w, s]]]
        },
        "properties": { "datetime": "2024-01-15T10:00:00Z" },
        "links": [],
        "assets": {}
    }))
}

#[allow(dead_code)]
pub fn point_item(id: &str, lng: f64, lat: f64) -> Item {
    item_from(json!({
        "type": "Feature",
        "id": id,
        "geometry": { "type": "Point", "coordinates": [lng, lat] },
        "properties": {}
    }))
}

#[allow(dead_code)]
pub fn null_geometry_item(id: &str) -> Item {
    item_from(json!({
        "type": "Feature",
        "id": id,
        "geometry": null,
        "properties": {}
    }))
}

pub fn item_from(value: Value) -> Item {
    serde_json::from_value(value).unwrap()
}

/// Three items, one of them without geometry.
#[allow(dead_code)]
pub fn three_items() -> Vec<Item> {
    vec![
        polygon_item("a", 0.0, 0.0, 2.0, 2.0),
        null_geometry_item("b"),
        point_item("c", 10.0, 20.0),
    ]
}

#[allow(dead_code)]
pub fn page(items: Vec<Item>) -> ItemCollection {
    ItemCollection {
        features: items,
        ..ItemCollection::default()
    }
}

/// Every call a projection made against the engine.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    AddVectorSource(String),
    AddFillLayer(String),
    SetSourceData(String, usize),
    SetLayerFilter(String, Value),
    AddRasterSource(String),
    SetRasterTiles(String, Option<String>),
    AddMarker(u32, LngLat),
    RemoveMarker(u32),
    FlyTo(LngLat, f64),
    FitBounds(BBox),
}

/// Map engine fake that records calls and keeps live markers clickable.
#[derive(Default)]
pub struct RecordingEngine {
    pub calls: Rc<RefCell<Vec<Call>>>,
    pub live_markers: Rc<RefCell<Vec<(u32, Box<dyn FnMut()>)>>>,
    pub last_data: Rc<RefCell<Option<FeatureCollection>>>,
    next_marker: u32,
}

#[allow(dead_code)]
impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// A second view onto the same recorded state, kept by the test after
    /// the engine itself moves into a projection.
    pub fn handles(&self) -> Self {
        Self {
            calls: self.calls.clone(),
            live_markers: self.live_markers.clone(),
            last_data: self.last_data.clone(),
            next_marker: 0,
        }
    }

    /// Click the marker at `index` among the currently live markers.
    pub fn click(live: &Rc<RefCell<Vec<(u32, Box<dyn FnMut()>)>>>, index: usize) {
        let (id, mut handler) = {
            let mut markers = live.borrow_mut();
            let (id, handler) = &mut markers[index];
            (*id, std::mem::replace(handler, Box::new(|| {})))
        };
        handler();
        if let Some((_, slot)) = live.borrow_mut().iter_mut().find(|(m, _)| *m == id) {
            *slot = handler;
        }
    }
}

impl MapEngine for RecordingEngine {
    type Marker = u32;

    fn add_vector_source(&mut self, id: &str) {
        self.calls.borrow_mut().push(Call::AddVectorSource(id.into()));
    }

    fn add_fill_layer(&mut self, layer: &FillLayer) {
        self.calls
            .borrow_mut()
            .push(Call::AddFillLayer(layer.id.into()));
    }

    fn set_source_data(&mut self, source: &str, data: &FeatureCollection) {
        self.calls
            .borrow_mut()
            .push(Call::SetSourceData(source.into(), data.features.len()));
        *self.last_data.borrow_mut() = Some(data.clone());
    }

    fn set_layer_filter(&mut self, layer: &str, filter: &Value) {
        self.calls
            .borrow_mut()
            .push(Call::SetLayerFilter(layer.into(), filter.clone()));
    }

    fn add_raster_source(&mut self, source: &str, _layer: &str) {
        self.calls
            .borrow_mut()
            .push(Call::AddRasterSource(source.into()));
    }

    fn set_raster_tiles(&mut self, source: &str, _layer: &str, tiles: Option<&str>) {
        self.calls
            .borrow_mut()
            .push(Call::SetRasterTiles(source.into(), tiles.map(str::to_string)));
    }

    fn add_marker(&mut self, at: LngLat, on_click: Box<dyn FnMut()>) -> u32 {
        let id = self.next_marker;
        self.next_marker += 1;
        self.calls.borrow_mut().push(Call::AddMarker(id, at));
        self.live_markers.borrow_mut().push((id, on_click));
        id
    }

    fn remove_marker(&mut self, marker: u32) {
        self.calls.borrow_mut().push(Call::RemoveMarker(marker));
        self.live_markers.borrow_mut().retain(|(id, _)| *id != marker);
    }

    fn fly_to(&mut self, at: LngLat, zoom: f64) {
        self.calls.borrow_mut().push(Call::FlyTo(at, zoom));
    }

    fn fit_bounds(&mut self, bbox: BBox, _padding: f64, _max_zoom: f64) {
        self.calls.borrow_mut().push(Call::FitBounds(bbox));
    }
}

/// Drive a future that never actually waits to completion.
#[allow(dead_code)]
pub fn block_on<F: Future>(future: F) -> F::Output {
    fn noop_raw() -> RawWaker {
        fn clone(_: *const ()) -> RawWaker {
            noop_raw()
        }
        fn noop(_: *const ()) {}
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, noop, noop, noop);
        RawWaker::new(std::ptr::null(), &VTABLE)
    }
    let waker = unsafe { Waker::from_raw(noop_raw()) };
    let mut cx = Context::from_waker(&waker);
    let mut future = pin!(future);
    loop {
        if let Poll::Ready(out) = future.as_mut().poll(&mut cx) {
            return out;
        }
    }
}
