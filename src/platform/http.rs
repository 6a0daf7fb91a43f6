//! Minimal HTTP transport for the remote score backend

use crate::score_store::StoreError;

/// Text-in, text-out HTTP client
#[allow(async_fn_in_trait)]
pub trait HttpTransport {
    async fn get(&self, url: &str) -> Result<String, StoreError>;
    async fn post(&self, url: &str, body: &str) -> Result<String, StoreError>;
}

/// Browser `fetch` (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct FetchTransport;

#[cfg(target_arch = "wasm32")]
impl FetchTransport {
    async fn send(&self, url: &str, method: &str, body: Option<&str>) -> Result<String, StoreError> {
        use wasm_bindgen::{JsCast, JsValue};
        use wasm_bindgen_futures::JsFuture;
        use web_sys::{Request, RequestInit, RequestMode, Response};

        let js_err = |e: JsValue| StoreError::Transport(format!("{:?}", e));

        let opts = RequestInit::new();
        opts.set_method(method);
        opts.set_mode(RequestMode::Cors);
        if let Some(body) = body {
            // Plain text body keeps the request "simple" (no CORS preflight)
            opts.set_body(&JsValue::from_str(body));
        }
        let request = Request::new_with_str_and_init(url, &opts).map_err(js_err)?;

        let window =
            web_sys::window().ok_or_else(|| StoreError::Transport("no window".to_string()))?;
        let response: Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(js_err)?
            .dyn_into()
            .map_err(js_err)?;
        if !response.ok() {
            return Err(StoreError::Http {
                status: response.status(),
            });
        }

        let text = JsFuture::from(response.text().map_err(js_err)?)
            .await
            .map_err(js_err)?;
        text.as_string()
            .ok_or_else(|| StoreError::Decode("response body is not text".to_string()))
    }
}

#[cfg(target_arch = "wasm32")]
impl HttpTransport for FetchTransport {
    async fn get(&self, url: &str) -> Result<String, StoreError> {
        self.send(url, "GET", None).await
    }

    async fn post(&self, url: &str, body: &str) -> Result<String, StoreError> {
        self.send(url, "POST", Some(body)).await
    }
}

/// Blocking `reqwest` client (native only). The game runs on a single
/// cooperative thread, so blocking inside the future is acceptable here.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Default)]
pub struct BlockingTransport {
    client: reqwest::blocking::Client,
}

#[cfg(not(target_arch = "wasm32"))]
impl BlockingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn finish(response: reqwest::blocking::Response) -> Result<String, StoreError> {
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Http {
                status: status.as_u16(),
            });
        }
        response
            .text()
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl HttpTransport for BlockingTransport {
    async fn get(&self, url: &str) -> Result<String, StoreError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        Self::finish(response)
    }

    async fn post(&self, url: &str, body: &str) -> Result<String, StoreError> {
        let response = self
            .client
            .post(url)
            .header("Content-Type", "text/plain;charset=utf-8")
            .body(body.to_string())
            .send()
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        Self::finish(response)
    }
}
