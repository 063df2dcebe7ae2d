use crate::filter::Filter;
use crate::geo::BBox;
use crate::query::ItemQuery;

/// Which part of the session a mutation touched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionChange {
    Collection,
    Items,
    Filter,
    BoundingBox,
    Page,
}

type Listener = Box<dyn FnMut(SessionChange, &Session)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// What the user is looking at: the selected collection, selected items,
/// active filter, and query bounding box.
///
/// Every field is last-write-wins. Switching to a different collection
/// empties the item selection, and any other change to the item query
/// returns to the first page. Mutations that change something notify
/// subscribers once per touched field, after the new state is in place, so
/// listeners always see a consistent snapshot.
pub struct Session {
    collection: Option<String>,
    /// Unique ids in selection order; the last one is the most recent.
    items: Vec<String>,
    filter: Filter,
    bbox: BBox,
    /// `next` link of the page being shown; `None` is the first page.
    page: Option<String>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            collection: None,
            items: Vec::new(),
            filter: Filter::default(),
            bbox: BBox::WORLD,
            page: None,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("collection", &self.collection)
            .field("items", &self.items)
            .field("filter", &self.filter)
            .field("bbox", &self.bbox)
            .field("page", &self.page)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Reads ---

    pub fn selected_collection(&self) -> Option<&str> {
        self.collection.as_deref()
    }

    pub fn selected_items(&self) -> &[String] {
        &self.items
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.items.iter().any(|i| i == id)
    }

    /// The item selected last, used for focusing and the detail pane.
    pub fn latest_item(&self) -> Option<&str> {
        self.items.last().map(String::as_str)
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn bounding_box(&self) -> BBox {
        self.bbox
    }

    pub fn page(&self) -> Option<&str> {
        self.page.as_deref()
    }

    /// Key for the item fetch; `None` disables it until a collection is chosen.
    pub fn item_query(&self) -> Option<ItemQuery> {
        let collection = self.collection.as_ref()?;
        Some(
            ItemQuery::new(collection.clone(), self.filter.clone(), self.bbox)
                .with_page(self.page.clone()),
        )
    }

    // --- Writes ---

    pub fn select_collection(&mut self, id: impl Into<String>) {
        let id = id.into();
        if self.collection.as_deref() == Some(id.as_str()) {
            return;
        }
        tracing::info!("Selected collection {}", id);
        self.collection = Some(id);
        let had_items = !self.items.is_empty();
        self.items.clear();
        let had_page = self.page.take().is_some();
        self.publish(SessionChange::Collection);
        if had_items {
            self.publish(SessionChange::Items);
        }
        if had_page {
            self.publish(SessionChange::Page);
        }
    }

    /// Replace the filter wholesale; no merging with the previous value.
    pub fn set_filter(&mut self, filter: Filter) {
        if self.filter == filter {
            return;
        }
        self.filter = filter;
        let had_page = self.page.take().is_some();
        self.publish(SessionChange::Filter);
        if had_page {
            self.publish(SessionChange::Page);
        }
    }

    pub fn set_bounding_box(&mut self, bbox: BBox) {
        if self.bbox == bbox {
            return;
        }
        self.bbox = bbox;
        let had_page = self.page.take().is_some();
        self.publish(SessionChange::BoundingBox);
        if had_page {
            self.publish(SessionChange::Page);
        }
    }

    /// Show the page behind a `next` link of the current results.
    pub fn next_page(&mut self, href: impl Into<String>) {
        if self.collection.is_none() {
            return;
        }
        self.set_page(Some(href.into()));
    }

    pub fn first_page(&mut self) {
        self.set_page(None);
    }

    fn set_page(&mut self, page: Option<String>) {
        if self.page == page {
            return;
        }
        self.page = page;
        self.publish(SessionChange::Page);
    }

    pub fn select_item(&mut self, id: impl Into<String>) {
        self.select_items([id.into()]);
    }

    /// Replace the selection. Duplicates keep their first position.
    pub fn select_items<I>(&mut self, ids: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut next: Vec<String> = Vec::new();
        for id in ids {
            let id = id.into();
            if !next.contains(&id) {
                next.push(id);
            }
        }
        self.replace_items(next);
    }

    /// Add `id` if absent, remove it if present.
    pub fn toggle_item_selection(&mut self, id: &str) {
        let mut next = self.items.clone();
        match next.iter().position(|i| i == id) {
            Some(pos) => {
                next.remove(pos);
            }
            None => next.push(id.to_string()),
        }
        self.replace_items(next);
    }

    pub fn clear_item_selection(&mut self) {
        self.replace_items(Vec::new());
    }

    fn replace_items(&mut self, next: Vec<String>) {
        if self.items == next {
            return;
        }
        self.items = next;
        self.publish(SessionChange::Items);
    }

    // --- Subscriptions ---

    /// Register a listener called after every effective change.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(SessionChange, &Session) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.listeners.retain(|(sid, _)| *sid != id);
    }

    fn publish(&mut self, change: SessionChange) {
        // Listeners get `&Session`, so they are moved out for the call.
        let mut listeners = std::mem::take(&mut self.listeners);
        for (_, listener) in listeners.iter_mut() {
            listener(change, &*self);
        }
        self.listeners = listeners;
    }
}
