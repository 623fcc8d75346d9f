use overlay_core::{AtlasConfig, ConfigError, OverlayFile, OverlaySource, SourceError};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

/// Fetches overlay files from `overlays/<name>` on the page's origin.
pub struct FetchSource {
    base: String,
}

impl FetchSource {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }
}

impl OverlaySource for FetchSource {
    async fn fetch(&self, file: &str) -> Result<OverlayFile, SourceError> {
        let url = format!("{}/{file}", self.base.trim_end_matches('/'));
        let body = fetch_text(&url).await.map_err(SourceError::Fetch)?;
        decode_overlay(&body)
    }
}

/// Bodies go through the same parser as files read from disk, so a
/// malformed overlay is a `Parse` error in both builds.
fn decode_overlay(body: &str) -> Result<OverlayFile, SourceError> {
    Ok(OverlayFile::from_json_str(body)?)
}

pub async fn fetch_config(url: &str) -> Result<AtlasConfig, ConfigError> {
    let body = fetch_text(url).await.map_err(ConfigError::Fetch)?;
    AtlasConfig::from_json_str(&body)
}

async fn fetch_text(url: &str) -> Result<String, String> {
    let window = web_sys::window().ok_or_else(|| "no window".to_string())?;

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::SameOrigin);

    let request = Request::new_with_str_and_init(url, &opts).map_err(describe)?;

    let response_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(describe)?;

    let response = response_value
        .dyn_into::<Response>()
        .map_err(|_| format!("{url}: not a response"))?;

    if !response.ok() {
        return Err(format!("{url}: HTTP {}", response.status()));
    }

    JsFuture::from(response.text().map_err(describe)?)
        .await
        .map_err(describe)?
        .as_string()
        .ok_or_else(|| format!("{url}: body is not text"))
}

fn describe(value: JsValue) -> String {
    value.dyn_ref::<js_sys::Error>().map_or_else(
        || value.as_string().unwrap_or_else(|| format!("{value:?}")),
        |error| String::from(error.message()),
    )
}

pub fn console_error(message: &str) {
    web_sys::console::error_1(&message.into());
}
