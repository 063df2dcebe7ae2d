//! Projection of session state and fetched items onto an interactive map.
//!
//! The map engine is imperative: sources, layers and markers are created and
//! removed by hand. [`MapProjection`] owns the engine handle plus every marker
//! it created, and exposes idempotent `sync_*` operations that re-derive the
//! map from the current snapshot. Calling them in any order, any number of
//! times, converges to the same map.

use std::rc::Rc;

use geojson::{Feature, FeatureCollection, JsonObject};
use serde_json::{json, Value};

use crate::fetch::{FetchState, QueryCell};
use crate::geo::{Anchor, BBox, LngLat};
use crate::query::{CatalogUrls, ItemQuery};
use crate::session::Session;
use crate::types::{Item, ItemCollection};

pub const FOOTPRINT_SOURCE: &str = "stac-items";
pub const FOOTPRINT_LAYER: &str = "stac-items-fill";
pub const SELECTED_LAYER: &str = "stac-items-selected";
pub const MOSAIC_SOURCE: &str = "stac-mosaic";
pub const MOSAIC_LAYER: &str = "stac-mosaic-tiles";

/// Feature property holding the item id; the selected-items filter matches on it.
pub const ID_PROPERTY: &str = "id";

/// Paint and camera settings.
#[derive(Clone, Debug, PartialEq)]
pub struct MapStyle {
    pub footprint_color: String,
    pub footprint_opacity: f64,
    pub selected_color: String,
    pub selected_opacity: f64,
    /// Zoom used when flying to a point item.
    pub point_zoom: f64,
    /// Padding in pixels around fitted bounds.
    pub fit_padding: f64,
    /// Upper zoom limit when fitting an item's bounds.
    pub fit_max_zoom: f64,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            footprint_color: "#3182ce".into(),
            footprint_opacity: 0.2,
            selected_color: "#e53e3e".into(),
            selected_opacity: 0.5,
            point_zoom: 16.0,
            fit_padding: 50.0,
            fit_max_zoom: 18.0,
        }
    }
}

/// A fill layer over a vector source.
#[derive(Clone, Debug, PartialEq)]
pub struct FillLayer {
    pub id: &'static str,
    pub source: &'static str,
    pub color: String,
    pub opacity: f64,
    /// Initial filter expression, if any.
    pub filter: Option<Value>,
}

/// The imperative surface of a map engine.
pub trait MapEngine {
    type Marker;

    fn add_vector_source(&mut self, id: &str);
    fn add_fill_layer(&mut self, layer: &FillLayer);
    fn set_source_data(&mut self, source: &str, data: &FeatureCollection);
    fn set_layer_filter(&mut self, layer: &str, filter: &Value);

    /// Create a raster source with no tiles and a layer drawing it.
    fn add_raster_source(&mut self, source: &str, layer: &str);
    /// Point the raster source at a tile template, or empty it with `None`.
    fn set_raster_tiles(&mut self, source: &str, layer: &str, tiles: Option<&str>);

    fn add_marker(&mut self, at: LngLat, on_click: Box<dyn FnMut()>) -> Self::Marker;
    fn remove_marker(&mut self, marker: Self::Marker);

    fn fly_to(&mut self, at: LngLat, zoom: f64);
    fn fit_bounds(&mut self, bbox: BBox, padding: f64, max_zoom: f64);
}

/// One rendered item footprint.
#[derive(Clone, Debug, PartialEq)]
pub struct Footprint {
    pub item_id: String,
    pub anchor: Anchor,
    geometry: geojson::Geometry,
}

impl Footprint {
    /// `None` for items without geometry; those stay off the map.
    pub fn of_item(item: &Item) -> Option<Self> {
        let geometry = item.geometry.clone()?;
        let anchor = Anchor::of_geometry(&geometry)?;
        Some(Self {
            item_id: item.id.clone(),
            anchor,
            geometry,
        })
    }

    pub fn to_feature(&self) -> Feature {
        let mut properties = JsonObject::new();
        properties.insert(ID_PROPERTY.into(), Value::String(self.item_id.clone()));
        Feature {
            bbox: None,
            geometry: Some(self.geometry.clone()),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }
}

pub fn footprints(items: &[Item]) -> Vec<Footprint> {
    items.iter().filter_map(Footprint::of_item).collect()
}

pub fn feature_collection(footprints: &[Footprint]) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: footprints.iter().map(Footprint::to_feature).collect(),
        foreign_members: None,
    }
}

/// Set-membership filter on the id property.
pub fn selection_filter(ids: &[String]) -> Value {
    json!(["in", ["get", ID_PROPERTY], ["literal", ids]])
}

/// Called with the item id when its marker is clicked.
pub type MarkerClick = Rc<dyn Fn(&str)>;

/// Items to draw for the session's current query.
///
/// `None` while that query is loading, so the previous footprints stay up
/// until the new page lands. A failed query yields an empty slice, which
/// clears the map.
pub fn settled_items<'a>(
    session: &Session,
    items: &'a QueryCell<ItemQuery, ItemCollection>,
) -> Option<&'a [Item]> {
    let key = session.item_query()?;
    if let Some(page) = items.data_for(&key) {
        return Some(page.features.as_slice());
    }
    match items.state() {
        FetchState::Failed(_) if items.key() == Some(&key) => Some(&[][..]),
        _ => None,
    }
}

/// Snapshot inputs for [`MapProjection::apply_snapshot`].
pub struct MapInputs<'a> {
    pub collection: Option<&'a str>,
    /// Items to draw; `None` keeps what is on the map. See [`settled_items`].
    pub items: Option<&'a [Item]>,
    pub selection: &'a [String],
}

impl<'a> MapInputs<'a> {
    pub fn new(session: &'a Session, items: Option<&'a [Item]>) -> Self {
        Self {
            collection: session.selected_collection(),
            items,
            selection: session.selected_items(),
        }
    }
}

/// Owns a map engine handle and keeps it consistent with session state.
pub struct MapProjection<E: MapEngine> {
    engine: E,
    urls: CatalogUrls,
    style: MapStyle,
    on_marker_click: MarkerClick,
    markers: Vec<E::Marker>,
    footprints: Vec<Footprint>,
    collection: Option<String>,
    selection: Vec<String>,
    focused: Option<String>,
}

impl<E: MapEngine> MapProjection<E> {
    /// Install the empty mosaic, then the footprint source and its two layers
    /// above it.
    pub fn new(
        mut engine: E,
        urls: CatalogUrls,
        style: MapStyle,
        on_marker_click: MarkerClick,
    ) -> Self {
        engine.add_raster_source(MOSAIC_SOURCE, MOSAIC_LAYER);
        engine.add_vector_source(FOOTPRINT_SOURCE);
        engine.add_fill_layer(&FillLayer {
            id: FOOTPRINT_LAYER,
            source: FOOTPRINT_SOURCE,
            color: style.footprint_color.clone(),
            opacity: style.footprint_opacity,
            filter: None,
        });
        engine.add_fill_layer(&FillLayer {
            id: SELECTED_LAYER,
            source: FOOTPRINT_SOURCE,
            color: style.selected_color.clone(),
            opacity: style.selected_opacity,
            filter: Some(selection_filter(&[])),
        });
        Self {
            engine,
            urls,
            style,
            on_marker_click,
            markers: Vec::new(),
            footprints: Vec::new(),
            collection: None,
            selection: Vec::new(),
            focused: None,
        }
    }

    pub fn footprints(&self) -> &[Footprint] {
        &self.footprints
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Re-derive the whole map from a snapshot.
    pub fn apply_snapshot(&mut self, inputs: &MapInputs<'_>) {
        self.sync_mosaic(inputs.collection);
        if let Some(items) = inputs.items {
            self.sync_features(items);
        }
        self.sync_selection(inputs.selection);
    }

    /// Rebuild footprints and markers from `items`. Items without geometry
    /// are skipped.
    pub fn sync_features(&mut self, items: &[Item]) {
        let next = footprints(items);
        if next == self.footprints {
            return;
        }
        tracing::debug!(
            "Rendering {} footprints ({} items without geometry)",
            next.len(),
            items.len() - next.len()
        );
        self.engine
            .set_source_data(FOOTPRINT_SOURCE, &feature_collection(&next));
        self.clear_markers();
        for footprint in &next {
            let on_click = self.on_marker_click.clone();
            let id = footprint.item_id.clone();
            let marker = self
                .engine
                .add_marker(footprint.anchor.position(), Box::new(move || on_click(&id)));
            self.markers.push(marker);
        }
        self.footprints = next;
        // A selected item may only now have a footprint to focus on.
        self.focus_latest();
    }

    /// Highlight exactly `ids` and focus the most recently selected one.
    pub fn sync_selection(&mut self, ids: &[String]) {
        if ids == self.selection.as_slice() {
            return;
        }
        self.engine
            .set_layer_filter(SELECTED_LAYER, &selection_filter(ids));
        self.selection = ids.to_vec();
        if self.selection.is_empty() {
            self.focused = None;
        } else {
            self.focus_latest();
        }
    }

    /// Repoint the mosaic at `collection` and drop the previous collection's
    /// footprints and markers.
    pub fn sync_mosaic(&mut self, collection: Option<&str>) {
        if self.collection.as_deref() == collection {
            return;
        }
        let tiles = collection.map(|id| self.urls.mosaic_tiles(id));
        self.engine
            .set_raster_tiles(MOSAIC_SOURCE, MOSAIC_LAYER, tiles.as_deref());
        self.engine
            .set_source_data(FOOTPRINT_SOURCE, &feature_collection(&[]));
        self.clear_markers();
        self.footprints.clear();
        self.focused = None;
        self.collection = collection.map(str::to_string);
    }

    /// Move the camera to an item: fly to a point, fit an area.
    pub fn focus_item(&mut self, id: &str) -> bool {
        let Some(anchor) = self
            .footprints
            .iter()
            .find(|f| f.item_id == id)
            .map(|f| f.anchor)
        else {
            return false;
        };
        match anchor {
            Anchor::Point(at) => self.engine.fly_to(at, self.style.point_zoom),
            Anchor::Area { bbox, .. } => {
                self.engine
                    .fit_bounds(bbox, self.style.fit_padding, self.style.fit_max_zoom)
            }
        }
        self.focused = Some(id.to_string());
        true
    }

    /// Remove every marker this projection created.
    pub fn teardown(&mut self) {
        self.clear_markers();
    }

    fn focus_latest(&mut self) {
        let Some(latest) = self.selection.last().cloned() else {
            return;
        };
        if self.focused.as_deref() != Some(latest.as_str()) {
            self.focus_item(&latest);
        }
    }

    fn clear_markers(&mut self) {
        for marker in self.markers.drain(..) {
            self.engine.remove_marker(marker);
        }
    }
}

impl<E: MapEngine> Drop for MapProjection<E> {
    fn drop(&mut self) {
        self.teardown();
    }
}
