use std::cell::RefCell;
use std::rc::Rc;

use stac_common::filter::{DateFilter, Filter};
use stac_common::geo::BBox;
use stac_common::session::{Session, SessionChange};

fn recorded(session: &mut Session) -> Rc<RefCell<Vec<SessionChange>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    session.subscribe(move |change, _| sink.borrow_mut().push(change));
    log
}

#[test]
fn new_session_is_empty() {
    let session = Session::new();
    assert_eq!(session.selected_collection(), None);
    assert!(session.selected_items().is_empty());
    assert!(session.filter().is_empty());
    assert!(session.bounding_box().is_world());
    assert_eq!(session.item_query(), None);
}

#[test]
fn switching_collection_clears_item_selection() {
    let mut session = Session::new();
    session.select_collection("c1");
    session.select_item("itemA");
    assert_eq!(session.selected_items(), ["itemA".to_string()]);

    session.select_collection("c2");
    assert_eq!(session.selected_collection(), Some("c2"));
    assert!(session.selected_items().is_empty());
}

#[test]
fn switching_collection_clears_multi_selection() {
    let mut session = Session::new();
    session.select_collection("c1");
    session.select_items(["a", "b", "c"]);
    session.select_collection("c2");
    assert!(session.selected_items().is_empty());
}

#[test]
fn reselecting_same_collection_keeps_selection() {
    let mut session = Session::new();
    session.select_collection("c1");
    session.select_item("a");
    session.select_collection("c1");
    assert_eq!(session.selected_items(), ["a".to_string()]);
}

#[test]
fn toggle_adds_then_removes() {
    let mut session = Session::new();
    session.select_items(["a", "b"]);

    session.toggle_item_selection("c");
    assert_eq!(session.selected_items(), ["a", "b", "c"].map(String::from));
    assert_eq!(session.latest_item(), Some("c"));

    session.toggle_item_selection("a");
    assert_eq!(session.selected_items(), ["b", "c"].map(String::from));
}

#[test]
fn toggle_twice_restores_selection() {
    let mut session = Session::new();
    session.select_items(["x", "y"]);
    let before = session.selected_items().to_vec();

    session.toggle_item_selection("z");
    session.toggle_item_selection("z");
    assert_eq!(session.selected_items(), before.as_slice());

    session.toggle_item_selection("x");
    session.toggle_item_selection("x");
    let mut after = session.selected_items().to_vec();
    after.sort();
    assert_eq!(after, before);
}

#[test]
fn select_item_replaces_multi_selection() {
    let mut session = Session::new();
    session.select_items(["a", "b"]);
    session.select_item("c");
    assert_eq!(session.selected_items(), ["c".to_string()]);
}

#[test]
fn select_items_drops_duplicates() {
    let mut session = Session::new();
    session.select_items(["a", "b", "a"]);
    assert_eq!(session.selected_items(), ["a", "b"].map(String::from));
}

#[test]
fn set_filter_replaces_wholesale() {
    let mut session = Session::new();
    let with_id = Filter::default().with_item_id("abc");
    session.set_filter(with_id);

    // A filter built from scratch drops the previous item id.
    let dates = DateFilter::new(
        DateFilter::parse_bound("2024-01-01"),
        DateFilter::parse_bound("2024-01-31"),
    );
    session.set_filter(Filter::default().with_dates(dates));
    assert_eq!(session.filter().item_id(), None);
    assert!(session.filter().dates.range().is_some());
}

#[test]
fn item_query_tracks_all_three_inputs() {
    let mut session = Session::new();
    session.select_collection("c1");
    let first = session.item_query().unwrap();

    session.set_filter(Filter::default().with_item_id("x"));
    let second = session.item_query().unwrap();
    assert_ne!(first, second);

    session.set_bounding_box(BBox::new(0.0, 0.0, 1.0, 1.0));
    let third = session.item_query().unwrap();
    assert_ne!(second, third);
    assert_eq!(third.collection_id, "c1");
    assert_eq!(third.bbox, BBox::new(0.0, 0.0, 1.0, 1.0));
}

#[test]
fn listeners_see_each_effective_change() {
    let mut session = Session::new();
    let log = recorded(&mut session);

    session.select_collection("c1");
    session.select_item("a");
    session.select_item("a");
    session.set_filter(Filter::default());
    session.set_bounding_box(BBox::WORLD);
    session.set_bounding_box(BBox::new(1.0, 1.0, 2.0, 2.0));
    session.select_collection("c2");

    assert_eq!(
        *log.borrow(),
        vec![
            SessionChange::Collection,
            SessionChange::Items,
            SessionChange::BoundingBox,
            SessionChange::Collection,
            SessionChange::Items,
        ]
    );
}

#[test]
fn listener_sees_state_after_cascade() {
    let mut session = Session::new();
    session.select_collection("c1");
    session.select_item("a");

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    session.subscribe(move |change, s| {
        sink.borrow_mut().push((
            change,
            s.selected_collection().map(str::to_string),
            s.selected_items().len(),
        ))
    });
    session.select_collection("c2");

    let seen = seen.borrow();
    assert_eq!(seen[0], (SessionChange::Collection, Some("c2".into()), 0));
}

#[test]
fn unsubscribe_stops_notifications() {
    let mut session = Session::new();
    let log = Rc::new(RefCell::new(0));
    let sink = log.clone();
    let id = session.subscribe(move |_, _| *sink.borrow_mut() += 1);

    session.select_item("a");
    session.unsubscribe(id);
    session.select_item("b");
    assert_eq!(*log.borrow(), 1);
}

#[test]
fn next_page_is_part_of_the_item_query() {
    let mut session = Session::new();
    session.next_page("https://api.example.org/stac/collections/c1/items?token=next:a");
    assert_eq!(session.page(), None);

    session.select_collection("c1");
    let first = session.item_query().unwrap();
    let log = recorded(&mut session);
    session.next_page("https://api.example.org/stac/collections/c1/items?token=next:a");

    let second = session.item_query().unwrap();
    assert_ne!(first, second);
    assert_eq!(
        second.page.as_deref(),
        Some("https://api.example.org/stac/collections/c1/items?token=next:a")
    );
    assert_eq!(*log.borrow(), vec![SessionChange::Page]);

    session.first_page();
    assert_eq!(session.item_query(), Some(first));
}

#[test]
fn query_changes_return_to_first_page() {
    let mut session = Session::new();
    session.select_collection("c1");

    session.next_page("p2");
    session.set_filter(Filter::default().with_item_id("x"));
    assert_eq!(session.page(), None);

    session.next_page("p2");
    session.set_bounding_box(BBox::new(0.0, 0.0, 1.0, 1.0));
    assert_eq!(session.page(), None);

    session.next_page("p2");
    let log = recorded(&mut session);
    session.select_collection("c2");
    assert_eq!(session.page(), None);
    assert_eq!(
        *log.borrow(),
        vec![SessionChange::Collection, SessionChange::Page]
    );
}

#[test]
fn selecting_items_keeps_the_page() {
    let mut session = Session::new();
    session.select_collection("c1");
    session.next_page("p2");
    session.select_item("a");
    assert_eq!(session.page(), Some("p2"));
}
