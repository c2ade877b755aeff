//! Client for the IPFS HTTP API.

use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::config::IpfsConfig;
use crate::observability::metrics;

/// Errors from the IPFS helpers. Transport and parse failures pass through unchanged.
#[derive(Debug, Error)]
pub enum IpfsError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Url(#[from] url::ParseError),
}

/// Result type for IPFS operations.
pub type IpfsResult<T> = Result<T, IpfsError>;

#[derive(Debug, Deserialize)]
struct AddResponse {
    #[serde(rename = "Hash")]
    hash: String,
}

/// Handle to one IPFS API node.
#[derive(Clone)]
pub struct IpfsClient {
    http: reqwest::Client,
    api_base: Url,
    credentials: Option<(String, String)>,
}

impl IpfsClient {
    /// Build a client for the node described by `config`. No request is sent.
    pub fn new(config: &IpfsConfig) -> IpfsResult<Self> {
        let api_base = config.base_url()?.join("api/v0/")?;
        let credentials = config
            .project_id
            .clone()
            .map(|id| (id, config.project_secret.clone().unwrap_or_default()));

        tracing::info!(api = %api_base, authenticated = credentials.is_some(), "IPFS client ready");

        Ok(Self {
            http: reqwest::Client::new(),
            api_base,
            credentials,
        })
    }

    fn post(&self, endpoint: &str) -> IpfsResult<RequestBuilder> {
        let request = self.http.post(self.api_base.join(endpoint)?);
        Ok(match &self.credentials {
            Some((user, secret)) => request.basic_auth(user, Some(secret)),
            None => request,
        })
    }

    /// Store raw bytes and return their CID.
    pub async fn add(&self, data: impl Into<Vec<u8>>) -> IpfsResult<String> {
        let data = data.into();
        let size = data.len();
        let form = Form::new().part("file", Part::bytes(data).file_name("data"));

        let added: AddResponse = self
            .post("add")?
            .multipart(form)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        metrics::record_ipfs_bytes("out", size);
        tracing::debug!(cid = %added.hash, size, "Added object to IPFS");

        Ok(added.hash)
    }

    /// Fetch the object behind `cid` into memory.
    pub async fn cat(&self, cid: &str) -> IpfsResult<Vec<u8>> {
        let response = self
            .post("cat")?
            .query(&[("arg", cid)])
            .send()
            .await?
            .error_for_status()?;

        let mut chunks = response.bytes_stream();
        let mut buffer = Vec::new();
        while let Some(chunk) = chunks.next().await {
            buffer.extend_from_slice(&chunk?);
        }

        metrics::record_ipfs_bytes("in", buffer.len());
        tracing::debug!(cid, size = buffer.len(), "Fetched object from IPFS");

        Ok(buffer)
    }

    /// Serialize `value` as JSON and store it.
    pub async fn add_json<T: Serialize + ?Sized>(&self, value: &T) -> IpfsResult<String> {
        let body = serde_json::to_vec(value)?;
        self.add(body).await
    }

    /// Fetch `cid` and parse it as JSON.
    pub async fn get_json<T: DeserializeOwned>(&self, cid: &str) -> IpfsResult<T> {
        let body = self.cat(cid).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Base URL of the node's API.
    pub fn api_base(&self) -> &Url {
        &self.api_base
    }
}

impl std::fmt::Debug for IpfsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IpfsClient")
            .field("api_base", &self.api_base.as_str())
            .field("authenticated", &self.credentials.is_some())
            .finish()
    }
}
