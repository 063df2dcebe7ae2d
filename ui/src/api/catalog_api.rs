use serde::de::DeserializeOwned;
use stac_common::error::FetchError;
use stac_common::fetch::with_retry;
use stac_common::query::{CatalogUrls, ItemQuery};
use stac_common::types::{CollectionList, ItemCollection, Queryables};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

pub async fn fetch_collections(urls: &CatalogUrls) -> Result<CollectionList, FetchError> {
    let url = urls.collections()?.to_string();
    with_retry(urls.config().retry, || get_json(url.clone())).await
}

pub async fn fetch_items(
    urls: &CatalogUrls,
    query: &ItemQuery,
) -> Result<ItemCollection, FetchError> {
    let url = urls.items(query)?.to_string();
    with_retry(urls.config().retry, || get_json(url.clone())).await
}

pub async fn fetch_queryables(
    urls: &CatalogUrls,
    collection_id: &str,
) -> Result<Queryables, FetchError> {
    let url = urls.queryables(collection_id)?.to_string();
    with_retry(urls.config().retry, || get_json(url.clone())).await
}

/// GET `url` and decode the JSON body.
async fn get_json<T: DeserializeOwned>(url: String) -> Result<T, FetchError> {
    tracing::debug!("GET {}", url);

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);

    let request = Request::new_with_str_and_init(&url, &opts).map_err(js_error)?;
    request
        .headers()
        .set("Accept", "application/json")
        .map_err(js_error)?;

    let window = web_sys::window().ok_or_else(|| FetchError::transport("no window"))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_error)?;
    let resp: Response = resp_value.dyn_into().map_err(js_error)?;

    if !resp.ok() {
        tracing::warn!("GET {} failed: HTTP {}", url, resp.status());
        return Err(FetchError::http(resp.status(), resp.status_text()));
    }

    let text = JsFuture::from(resp.text().map_err(js_error)?)
        .await
        .map_err(js_error)?;
    let body = text
        .as_string()
        .ok_or_else(|| FetchError::data_shape(resp.status(), "response not string"))?;

    Ok(serde_json::from_str(&body)?)
}

/// Rejected fetch promises carry a JS `TypeError`; there is no status.
fn js_error(e: JsValue) -> FetchError {
    let message = e
        .dyn_ref::<js_sys::Error>()
        .map(|err| String::from(err.message()))
        .unwrap_or_else(|| format!("{:?}", e));
    FetchError::transport(message)
}
