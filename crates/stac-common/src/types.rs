use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// --- Collections ---

/// Response body of `GET /collections`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CollectionList {
    #[serde(default)]
    pub collections: Vec<Collection>,
    #[serde(default)]
    pub links: Vec<Link>,
}

/// A group of imagery items sharing provenance and extent.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Collection {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub extent: Option<Extent>,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl Collection {
    /// Title for pickers; falls back to the id.
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.id)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Extent {
    #[serde(default)]
    pub spatial: Option<SpatialExtent>,
    #[serde(default)]
    pub temporal: Option<TemporalExtent>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SpatialExtent {
    #[serde(default)]
    pub bbox: Vec<Vec<f64>>,
}

/// Open-ended intervals are `null` on the wire.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct TemporalExtent {
    #[serde(default)]
    pub interval: Vec<Vec<Option<String>>>,
}

// --- Items ---

/// Response body of `GET /collections/{id}/items`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItemCollection {
    #[serde(rename = "type", default = "feature_collection_type")]
    pub kind: String,
    #[serde(default)]
    pub features: Vec<Item>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_matched: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_returned: Option<u64>,
}

fn feature_collection_type() -> String {
    "FeatureCollection".into()
}

impl Default for ItemCollection {
    fn default() -> Self {
        Self {
            kind: feature_collection_type(),
            features: Vec::new(),
            links: Vec::new(),
            number_matched: None,
            number_returned: None,
        }
    }
}

impl ItemCollection {
    /// Link to the next page, if the server advertises one.
    pub fn next_link(&self) -> Option<&Link> {
        self.links.iter().find(|l| l.rel == "next")
    }

    pub fn find(&self, id: &str) -> Option<&Item> {
        self.features.iter().find(|item| item.id == id)
    }
}

/// One piece of aerial imagery.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: String,
    #[serde(default)]
    pub collection: Option<String>,
    /// `None` when the server sends `"geometry": null`.
    #[serde(default)]
    pub geometry: Option<geojson::Geometry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Vec<f64>>,
    #[serde(default)]
    pub properties: ItemProperties,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub assets: BTreeMap<String, Asset>,
}

impl Item {
    pub fn thumbnail(&self) -> Option<&str> {
        self.asset_href("thumbnail")
    }

    pub fn visual(&self) -> Option<&str> {
        self.asset_href("visual")
    }

    fn asset_href(&self, key: &str) -> Option<&str> {
        self.assets
            .get(key)
            .map(|a| a.href.as_str())
            .filter(|href| !href.is_empty())
    }
}

/// The item properties this viewer reads. Everything else is kept in `extra`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ItemProperties {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub datetime: Option<String>,
    #[serde(default)]
    pub start_datetime: Option<String>,
    #[serde(default)]
    pub end_datetime: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
    /// Ground sample distance in meters.
    #[serde(default)]
    pub gsd: Option<f64>,
    #[serde(default, rename = "oam:producer_name")]
    pub producer_name: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub instruments: Option<Vec<String>>,
    #[serde(default)]
    pub providers: Option<Vec<Provider>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Provider {
    pub name: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Asset {
    pub href: String,
    #[serde(rename = "type", default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Link {
    pub rel: String,
    pub href: String,
    #[serde(rename = "type", default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

// --- Queryables ---

/// Filterable properties advertised for a collection (JSON Schema subset).
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Queryables {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, Value>,
}

impl Queryables {
    /// Property names eligible for filter expressions, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.properties.keys().map(String::as_str).collect()
    }
}
