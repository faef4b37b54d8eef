//! Store account API client.
//!
//! Async HTTP client using `reqwest`; every request carries the session
//! token in the `X-Shopware-Token` header.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Error, ErrorKind, OpContext};
use crate::types::SoftwareVersion;

pub const DEFAULT_BASE_URL: &str = "https://api.shopware.com";

const TOKEN_HEADER: &str = "x-shopware-token";

/// Authenticated store API client.
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Creates a client that authenticates with the given session token.
    pub fn new(token: &str) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(token)
            .map_err(|_| Error::new("client", ErrorKind::InvalidToken))?;
        headers.insert(HeaderName::from_static(TOKEN_HEADER), value);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .op("client")?;

        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Points the client at another API host.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Returns an endpoint scoped to one producer account.
    pub fn producer(&self, producer_id: i32) -> ProducerEndpoint<'_> {
        ProducerEndpoint {
            client: self,
            producer_id,
        }
    }

    /// Fetches the platform version catalog.
    pub async fn get_software_versions(&self) -> Result<Vec<SoftwareVersion>, Error> {
        self.get_json("/pluginstatics/softwareVersions")
            .await
            .op("get_software_versions")
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    /// Sends a request and returns the raw body of a successful response.
    pub(crate) async fn send(&self, req: RequestBuilder) -> Result<Vec<u8>, ErrorKind> {
        let resp = req.send().await?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ErrorKind::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(resp.bytes().await?.to_vec())
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ErrorKind> {
        let body = self.send(self.request(Method::GET, path)).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Sends `payload` as JSON and returns the raw response body.
    pub(crate) async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        payload: &B,
    ) -> Result<Vec<u8>, ErrorKind> {
        let body = serde_json::to_vec(payload)?;
        let req = self
            .request(method, path)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body);
        self.send(req).await
    }
}

/// Calls scoped to a producer account.
///
/// Binary operations live under `/producers/{id}/plugins/...`; icon,
/// gallery and review calls are addressed by extension id alone.
#[derive(Clone, Copy)]
pub struct ProducerEndpoint<'a> {
    pub(crate) client: &'a Client,
    pub(crate) producer_id: i32,
}

impl ProducerEndpoint<'_> {
    pub fn producer_id(&self) -> i32 {
        self.producer_id
    }

    pub(crate) fn binaries_path(&self, extension_id: i32) -> String {
        format!(
            "/producers/{}/plugins/{extension_id}/binaries",
            self.producer_id
        )
    }
}
