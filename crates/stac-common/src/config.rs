/// Catalog endpoints and fetch limits, baked in at build time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Origin of the catalog deployment, without a trailing slash.
    pub base_url: String,
    /// Path segment of the STAC API under `base_url`.
    pub api_path: String,
    /// Path segment of the raster tiler under `base_url`.
    pub raster_path: String,
    /// Maximum number of items requested per page.
    pub items_limit: u32,
    /// Automatic retries for a transient fetch failure, at most [`MAX_RETRY`].
    pub retry: u8,
}

const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_API_PATH: &str = "/stac";
const DEFAULT_RASTER_PATH: &str = "/raster";
const DEFAULT_ITEMS_LIMIT: u32 = 40;
const DEFAULT_RETRY: u8 = 1;

/// Upper bound on automatic retries; larger configured values are clamped.
pub const MAX_RETRY: u8 = 1;

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_path: DEFAULT_API_PATH.into(),
            raster_path: DEFAULT_RASTER_PATH.into(),
            items_limit: DEFAULT_ITEMS_LIMIT,
            retry: DEFAULT_RETRY,
        }
    }
}

impl CatalogConfig {
    /// Configuration from `STAC_*` variables present when the crate was built.
    pub fn from_build_env() -> Self {
        Self::from_values(
            option_env!("STAC_API_URL"),
            option_env!("STAC_API_PATH"),
            option_env!("STAC_RASTER_PATH"),
            option_env!("STAC_ITEMS_LIMIT"),
            option_env!("STAC_FETCH_RETRY"),
        )
    }

    /// Build from optional raw values; unset or unparsable values keep their default.
    pub fn from_values(
        base_url: Option<&str>,
        api_path: Option<&str>,
        raster_path: Option<&str>,
        items_limit: Option<&str>,
        retry: Option<&str>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            base_url: base_url
                .map(|s| s.trim_end_matches('/').to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.base_url),
            api_path: api_path.map(normalize_segment).unwrap_or(defaults.api_path),
            raster_path: raster_path
                .map(normalize_segment)
                .unwrap_or(defaults.raster_path),
            items_limit: items_limit
                .and_then(|v| v.trim().parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.items_limit),
            retry: retry
                .and_then(|v| v.trim().parse::<u8>().ok())
                .map(|n| n.min(MAX_RETRY))
                .unwrap_or(defaults.retry),
        }
    }

    /// Root of the STAC API, e.g. `http://host/stac`.
    pub fn api_root(&self) -> String {
        format!("{}{}", self.base_url, self.api_path)
    }

    /// Root of the raster tiler, e.g. `http://host/raster`.
    pub fn raster_root(&self) -> String {
        format!("{}{}", self.base_url, self.raster_path)
    }
}

/// `"stac/"` -> `"/stac"`, `""` -> `""`.
fn normalize_segment(segment: &str) -> String {
    let trimmed = segment.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

