//! HTTP client side of the sync protocol
//!
//! One [`SyncClient`] wraps a remote URL plus optional basic auth
//! credentials and exposes the four endpoint calls that clone, push and
//! pull are built from. Non-success statuses surface as [`OrbError`]
//! kinds: `AuthError` for 401/403, `ProtocolError` for everything else,
//! with the status and response body in the message.

use crate::artifacts::branch::branch_name::SymRefName;
use crate::artifacts::core::error::OrbError;
use crate::artifacts::objects::object_id::ObjectId;
use crate::sync::protocol::{
    self, FetchRequest, PushResponse, RefUpdateRequest, RefUpdateResponse,
};
use anyhow::Context;
use bytes::Bytes;
use reqwest::StatusCode;
use std::time::Duration;

const USER_AGENT: &str = "orb/1.0";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Whether a string names a remote the sync client can speak to
pub fn is_valid_url(raw_url: &str) -> bool {
    reqwest::Url::parse(raw_url)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Client for one remote repository
pub struct SyncClient {
    base_url: String,
    credentials: Option<(String, String)>,
    http: reqwest::Client,
}

impl SyncClient {
    pub fn new(base_url: &str, credentials: Option<(String, String)>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to create HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            http,
        })
    }

    /// `GET /info/refs`, parsed into `(refname, commit id)` pairs
    pub async fn fetch_refs(&self) -> anyhow::Result<Vec<(SymRefName, ObjectId)>> {
        let url = format!("{}/info/refs", self.base_url);
        let response = self
            .with_auth(self.http.get(&url))
            .send()
            .await
            .with_context(|| format!("failed to connect to remote {url}"))?;

        let body = self.success_body(response, "server responded").await?;
        protocol::parse_ref_advertisement(
            std::str::from_utf8(&body).context("ref advertisement is not UTF-8")?,
        )
    }

    /// `POST /objects/fetch`, decoded into canonical object frames
    ///
    /// The returned frames are unverified; storing them recomputes each ID.
    pub async fn fetch_objects(&self, request: &FetchRequest) -> anyhow::Result<Vec<Bytes>> {
        let url = format!("{}/objects/fetch", self.base_url);
        let response = self
            .with_auth(self.http.post(&url).body(request.render()))
            .send()
            .await
            .with_context(|| format!("failed to connect to remote {url}"))?;

        let body = self.success_body(response, "server rejected fetch").await?;
        protocol::decode_object_stream(&body)
    }

    /// `POST /objects/push`, returns how many objects the server applied
    pub async fn push_objects(&self, frames: &[Bytes]) -> anyhow::Result<usize> {
        let url = format!("{}/objects/push", self.base_url);
        let stream = protocol::encode_object_stream(frames)?;
        let response = self
            .with_auth(self.http.post(&url).body(stream))
            .send()
            .await
            .with_context(|| format!("failed to connect to remote {url}"))?;

        let body = self.success_body(response, "server rejected push").await?;
        let accepted: PushResponse =
            serde_json::from_slice(&body).context("malformed push response")?;

        Ok(accepted.applied)
    }

    /// `POST /refs/update`, a compare-and-swap against `old`
    ///
    /// `old` is the tip this client last observed, `None` when the ref must
    /// not exist yet. A conflict means someone else moved the ref since.
    pub async fn update_ref(
        &self,
        ref_name: &SymRefName,
        old: Option<&ObjectId>,
        new: &ObjectId,
    ) -> anyhow::Result<()> {
        let url = format!("{}/refs/update", self.base_url);
        let request = RefUpdateRequest {
            ref_name: ref_name.as_ref_path().to_string(),
            old: old.map(|oid| oid.to_string()),
            new: new.to_string(),
        };

        let response = self
            .with_auth(self.http.post(&url).json(&request))
            .send()
            .await
            .with_context(|| format!("failed to connect to remote {url}"))?;

        if response.status() == StatusCode::CONFLICT {
            let rejection: RefUpdateResponse = response
                .json()
                .await
                .context("malformed ref update response")?;
            let reason = rejection
                .error
                .unwrap_or_else(|| "ref moved on the remote".to_string());

            return Err(OrbError::ProtocolError(format!(
                "server rejected ref update: {reason}\nhint: pull the remote changes first"
            ))
            .into());
        }

        let body = self
            .success_body(response, "server rejected ref update")
            .await?;
        let accepted: RefUpdateResponse =
            serde_json::from_slice(&body).context("malformed ref update response")?;
        if !accepted.ok {
            let reason = accepted
                .error
                .unwrap_or_else(|| "no reason given".to_string());

            return Err(
                OrbError::ProtocolError(format!("server rejected ref update: {reason}")).into(),
            );
        }

        Ok(())
    }

    fn with_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.credentials {
            Some((username, password)) => request.basic_auth(username, Some(password)),
            None => request,
        }
    }

    async fn success_body(
        &self,
        response: reqwest::Response,
        rejection: &str,
    ) -> anyhow::Result<Bytes> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(
                OrbError::AuthError(format!("server responded with status {status}")).into(),
            );
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OrbError::ProtocolError(format!(
                "{rejection} with status {status}: {body}"
            ))
            .into());
        }

        Ok(response.bytes().await?)
    }
}
