mod fixtures;

use std::cell::RefCell;
use std::rc::Rc;

use fixtures::{three_items, Call, RecordingEngine};
use serde_json::json;
use stac_common::config::CatalogConfig;
use stac_common::error::FetchError;
use stac_common::fetch::QueryCell;
use stac_common::geo::{BBox, LngLat};
use stac_common::map::{
    selection_filter, settled_items, MapInputs, MapProjection, MapStyle, MarkerClick,
    FOOTPRINT_SOURCE, MOSAIC_SOURCE, SELECTED_LAYER,
};
use stac_common::query::{CatalogUrls, ItemQuery};
use stac_common::session::Session;
use stac_common::types::{Item, ItemCollection};

type Calls = Rc<RefCell<Vec<Call>>>;

fn projection_with(
    on_click: MarkerClick,
) -> (MapProjection<RecordingEngine>, Calls, RecordingEngine) {
    let engine = RecordingEngine::new();
    let calls = engine.calls.clone();
    let handles = engine.handles();
    let urls = CatalogUrls::new(CatalogConfig::from_values(
        Some("https://tiles.example.org"),
        Some("/stac"),
        Some("/raster"),
        None,
        None,
    ));
    let projection = MapProjection::new(engine, urls, MapStyle::default(), on_click);
    (projection, calls, handles)
}

fn projection() -> (MapProjection<RecordingEngine>, Calls, RecordingEngine) {
    projection_with(Rc::new(|_: &str| {}))
}

fn feature_ids(handles: &RecordingEngine) -> Vec<String> {
    handles
        .last_data
        .borrow()
        .as_ref()
        .map(|fc| {
            fc.features
                .iter()
                .map(|f| f.property("id").unwrap().as_str().unwrap().to_string())
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn mount_installs_sources_and_layers() {
    let (_projection, calls, _) = projection();
    let calls = calls.borrow();
    // The mosaic source exists from the start, below the footprints.
    assert_eq!(calls[0], Call::AddRasterSource(MOSAIC_SOURCE.into()));
    assert!(!calls.iter().any(|c| matches!(c, Call::SetRasterTiles(..))));
    assert!(calls.contains(&Call::AddVectorSource(FOOTPRINT_SOURCE.into())));
    assert_eq!(
        calls
            .iter()
            .filter(|c| matches!(c, Call::AddFillLayer(_)))
            .count(),
        2
    );
}

#[test]
fn null_geometry_items_are_not_rendered() {
    let (mut projection, _, handles) = projection();
    projection.sync_features(&three_items());

    assert_eq!(feature_ids(&handles), vec!["a".to_string(), "c".to_string()]);
    assert_eq!(projection.footprints().len(), 2);
    assert_eq!(projection.marker_count(), 2);
}

#[test]
fn markers_sit_at_point_or_envelope_center() {
    let (mut projection, calls, _) = projection();
    projection.sync_features(&three_items());

    let positions: Vec<LngLat> = calls
        .borrow()
        .iter()
        .filter_map(|c| match c {
            Call::AddMarker(_, at) => Some(*at),
            _ => None,
        })
        .collect();
    assert_eq!(
        positions,
        vec![LngLat::new(1.0, 1.0), LngLat::new(10.0, 20.0)]
    );
}

#[test]
fn refresh_replaces_every_marker() {
    let (mut projection, calls, handles) = projection();
    projection.sync_features(&three_items());
    let mut fewer = three_items();
    fewer.remove(0);
    projection.sync_features(&fewer);

    let removed = calls
        .borrow()
        .iter()
        .filter(|c| matches!(c, Call::RemoveMarker(_)))
        .count();
    assert_eq!(removed, 2);
    assert_eq!(handles.live_markers.borrow().len(), 1);
    assert_eq!(projection.marker_count(), 1);
}

#[test]
fn sync_features_is_idempotent() {
    let (mut projection, calls, _) = projection();
    projection.sync_features(&three_items());
    let before = calls.borrow().len();
    projection.sync_features(&three_items());
    assert_eq!(calls.borrow().len(), before);
}

#[test]
fn selection_sets_membership_filter_and_fits_latest() {
    let (mut projection, calls, _) = projection();
    projection.sync_features(&three_items());
    let ids = vec!["c".to_string(), "a".to_string()];
    projection.sync_selection(&ids);

    let calls = calls.borrow();
    assert!(calls.contains(&Call::SetLayerFilter(
        SELECTED_LAYER.into(),
        json!(["in", ["get", "id"], ["literal", ["c", "a"]]])
    )));
    assert_eq!(
        calls.last(),
        Some(&Call::FitBounds(BBox::new(0.0, 0.0, 2.0, 2.0)))
    );
}

#[test]
fn empty_selection_does_not_move_camera() {
    let (mut projection, calls, _) = projection();
    projection.sync_features(&three_items());
    projection.sync_selection(&["a".to_string()]);
    let moves_before = camera_moves(&calls);
    projection.sync_selection(&[]);

    assert_eq!(camera_moves(&calls), moves_before);
    assert_eq!(
        calls.borrow().last(),
        Some(&Call::SetLayerFilter(SELECTED_LAYER.into(), selection_filter(&[])))
    );
}

fn camera_moves(calls: &Calls) -> usize {
    calls
        .borrow()
        .iter()
        .filter(|c| matches!(c, Call::FlyTo(..) | Call::FitBounds(_)))
        .count()
}

#[test]
fn collection_change_clears_features_and_repoints_mosaic() {
    let (mut projection, calls, handles) = projection();
    projection.sync_mosaic(Some("c1"));
    projection.sync_features(&three_items());
    projection.sync_mosaic(Some("c2"));

    assert!(feature_ids(&handles).is_empty());
    assert_eq!(projection.marker_count(), 0);
    assert!(handles.live_markers.borrow().is_empty());
    assert!(calls.borrow().contains(&Call::SetRasterTiles(
        MOSAIC_SOURCE.into(),
        Some("https://tiles.example.org/raster/collections/c2/tiles/WebMercatorQuad/{z}/{x}/{y}.png?assets=visual".into())
    )));
}

#[test]
fn teardown_removes_all_markers() {
    let (mut projection, _, handles) = projection();
    projection.sync_features(&three_items());
    assert_eq!(handles.live_markers.borrow().len(), 2);
    drop(projection);
    assert!(handles.live_markers.borrow().is_empty());
}

#[test]
fn marker_click_focuses_and_selects() {
    let session = Rc::new(RefCell::new(Session::new()));
    session.borrow_mut().select_collection("c1");
    let slot: Rc<RefCell<Option<MapProjection<RecordingEngine>>>> = Rc::new(RefCell::new(None));

    let on_click: MarkerClick = {
        let session = session.clone();
        let slot = slot.clone();
        Rc::new(move |id: &str| {
            if let Some(p) = slot.borrow_mut().as_mut() {
                p.focus_item(id);
            }
            session.borrow_mut().select_item(id);
        })
    };
    let (projection, calls, handles) = projection_with(on_click);
    *slot.borrow_mut() = Some(projection);
    slot.borrow_mut()
        .as_mut()
        .unwrap()
        .sync_features(&three_items());

    // Second marker belongs to point item "c".
    RecordingEngine::click(&handles.live_markers, 1);

    assert_eq!(session.borrow().selected_items(), ["c".to_string()]);
    assert!(calls
        .borrow()
        .contains(&Call::FlyTo(LngLat::new(10.0, 20.0), MapStyle::default().point_zoom)));

    // Syncing the resulting selection does not fly a second time.
    let before = camera_moves(&calls);
    let selection = session.borrow().selected_items().to_vec();
    slot.borrow_mut()
        .as_mut()
        .unwrap()
        .sync_selection(&selection);
    assert_eq!(camera_moves(&calls), before);
}

#[test]
fn apply_converges_regardless_of_order() {
    let items = three_items();
    let mut session = Session::new();
    session.select_collection("c1");
    session.select_item("a");

    let (mut first, _, first_handles) = projection();
    first.sync_selection(session.selected_items());
    first.sync_features(&items);
    first.sync_mosaic(Some("c1"));
    first.apply_snapshot(&MapInputs::new(&session, Some(&items)));

    let (mut second, _, second_handles) = projection();
    second.apply_snapshot(&MapInputs::new(&session, Some(&items)));

    assert_eq!(first.footprints(), second.footprints());
    assert_eq!(feature_ids(&first_handles), feature_ids(&second_handles));
    assert_eq!(first.marker_count(), second.marker_count());
}

#[test]
fn stale_item_response_never_reaches_map() {
    let mut session = Session::new();
    let mut cell: QueryCell<ItemQuery, Vec<Item>> = QueryCell::new();
    let (mut projection, _, handles) = projection();

    session.select_collection("c1");
    let old = cell.request(session.item_query()).unwrap();
    session.select_collection("c2");
    let new = cell.request(session.item_query()).unwrap();

    let c2_items = vec![fixtures::point_item("fresh", 1.0, 1.0)];
    assert!(cell.complete(new, Ok(c2_items)));
    let current = session.item_query().unwrap();
    projection.apply_snapshot(&MapInputs::new(
        &session,
        cell.data_for(&current).map(Vec::as_slice),
    ));

    // The old collection's response arrives late.
    assert!(!cell.complete(old, Ok(three_items())));
    projection.apply_snapshot(&MapInputs::new(
        &session,
        cell.data_for(&current).map(Vec::as_slice),
    ));

    assert_eq!(feature_ids(&handles), vec!["fresh".to_string()]);
}

#[test]
fn failed_query_clears_previous_footprints() {
    let mut session = Session::new();
    let mut cell: QueryCell<ItemQuery, ItemCollection> = QueryCell::new();
    let (mut projection, _, handles) = projection();

    session.select_collection("c1");
    let first = cell.request(session.item_query()).unwrap();
    cell.complete(first, Ok(fixtures::page(three_items())));
    projection.apply_snapshot(&MapInputs::new(&session, settled_items(&session, &cell)));
    assert_eq!(projection.marker_count(), 2);

    // While the narrowed query loads, the old footprints stay.
    session.set_bounding_box(BBox::new(0.0, 0.0, 1.0, 1.0));
    let narrowed = cell.request(session.item_query()).unwrap();
    assert_eq!(settled_items(&session, &cell), None);
    projection.apply_snapshot(&MapInputs::new(&session, settled_items(&session, &cell)));
    assert_eq!(projection.marker_count(), 2);

    cell.complete(narrowed, Err(FetchError::http(500, "Internal Server Error")));
    projection.apply_snapshot(&MapInputs::new(&session, settled_items(&session, &cell)));
    assert_eq!(projection.marker_count(), 0);
    assert!(projection.footprints().is_empty());
    assert!(feature_ids(&handles).is_empty());
}

#[test]
fn settled_items_ignores_failure_of_another_query() {
    let mut session = Session::new();
    let mut cell: QueryCell<ItemQuery, ItemCollection> = QueryCell::new();

    session.select_collection("c1");
    let ticket = cell.request(session.item_query()).unwrap();
    cell.complete(ticket, Err(FetchError::transport("offline")));
    session.select_collection("c2");

    assert_eq!(settled_items(&session, &cell), None);
}
