use chrono::{NaiveDate, NaiveTime, SecondsFormat};
use url::Url;

use crate::config::CatalogConfig;
use crate::error::FetchError;
use crate::filter::Filter;
use crate::geo::BBox;

/// Everything an item request depends on. Doubles as the cache/staleness key:
/// two requests are interchangeable exactly when their queries are equal.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemQuery {
    pub collection_id: String,
    pub filter: Filter,
    pub bbox: BBox,
    /// `next` link of a previous page. `None` is the first page.
    pub page: Option<String>,
}

impl ItemQuery {
    pub fn new(collection_id: impl Into<String>, filter: Filter, bbox: BBox) -> Self {
        Self {
            collection_id: collection_id.into(),
            filter,
            bbox,
            page: None,
        }
    }

    pub fn with_page(mut self, page: Option<String>) -> Self {
        self.page = page;
        self
    }

    /// Query parameters, unencoded and in request order.
    pub fn params(&self, limit: u32) -> Vec<(&'static str, String)> {
        let mut params = vec![("limit", limit.to_string())];
        if let Some((start, end)) = self.filter.dates.range() {
            params.push(("datetime", datetime_interval(start, end)));
        }
        if let Some(id) = self.filter.item_id() {
            params.push(("filter-lang", "cql2-text".into()));
            params.push(("filter", id_expression(id)));
        }
        if !self.bbox.is_world() {
            params.push(("bbox", self.bbox.to_param()));
        }
        params
    }
}

/// `2024-01-01` -> `2024-01-01T00:00:00.000Z`.
pub fn iso_instant(date: NaiveDate) -> String {
    date.and_time(NaiveTime::MIN)
        .and_utc()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// ISO-8601 interval `start/end`, both at midnight UTC.
pub fn datetime_interval(start: NaiveDate, end: NaiveDate) -> String {
    format!("{}/{}", iso_instant(start), iso_instant(end))
}

/// CQL2-text equality on the item id. Embedded quotes are doubled.
pub fn id_expression(id: &str) -> String {
    format!("id = '{}'", id.replace('\'', "''"))
}

/// Endpoint builder for one catalog deployment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogUrls {
    config: CatalogConfig,
}

impl CatalogUrls {
    pub fn new(config: CatalogConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn collections(&self) -> Result<Url, FetchError> {
        Ok(Url::parse(&format!("{}/collections", self.config.api_root()))?)
    }

    /// First page from the query parameters; later pages follow the server's
    /// `next` link, which already carries them.
    pub fn items(&self, query: &ItemQuery) -> Result<Url, FetchError> {
        if let Some(next) = &query.page {
            return Ok(self.collections()?.join(next)?);
        }
        let mut url = Url::parse(&format!(
            "{}/collections/{}/items",
            self.config.api_root(),
            query.collection_id
        ))?;
        url.query_pairs_mut()
            .extend_pairs(query.params(self.config.items_limit));
        Ok(url)
    }

    pub fn queryables(&self, collection_id: &str) -> Result<Url, FetchError> {
        Ok(Url::parse(&format!(
            "{}/collections/{}/queryables",
            self.config.api_root(),
            collection_id
        ))?)
    }

    /// Tile template for the collection mosaic. `{z}/{x}/{y}` stay literal for
    /// the map engine to fill in.
    pub fn mosaic_tiles(&self, collection_id: &str) -> String {
        format!(
            "{}/collections/{}/tiles/WebMercatorQuad/{{z}}/{{x}}/{{y}}.png?assets=visual",
            self.config.raster_root(),
            collection_id
        )
    }

    /// WMTS capabilities document for external GIS clients.
    pub fn wmts_capabilities(&self, collection_id: &str) -> String {
        format!(
            "{}/collections/{}/WebMercatorQuad/WMTSCapabilities.xml?minzoom=12&maxzoom=22&assets=visual",
            self.config.raster_root(),
            collection_id
        )
    }
}
