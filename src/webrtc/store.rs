//! JSON-file-backed privacy store.
//!
//! The real IP-handling policy lives behind the browser's privacy API. For
//! the diagnostic binary and for tests, [`FilePolicyStore`] implements the
//! same [`PrivacyNetwork`] seam over a small JSON file holding
//! `{"value": "<policy>"}` — the shape the privacy API's get call returns.
//!
//! A store whose backing file does not exist models a host without the
//! privacy API: opening it fails with [`WebRtcError::Unsupported`] instead
//! of silently pretending the policy is managed.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use crate::webrtc::policy::{IpHandlingPolicy, PrivacyNetwork, WebRtcError};

/// On-disk record, mirroring the privacy API's `{value}` envelope.
#[derive(Debug, Serialize, Deserialize)]
struct PolicyRecord {
    value: IpHandlingPolicy,
}

/// File-backed [`PrivacyNetwork`] implementation.
#[derive(Debug, Clone)]
pub struct FilePolicyStore {
    path: PathBuf,
}

impl FilePolicyStore {
    /// Opens an existing store. A missing backing file is the
    /// missing-privacy-API condition and fails hard.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self, WebRtcError> {
        let path = path.as_ref().to_path_buf();
        if !fs::try_exists(&path).await? {
            return Err(WebRtcError::Unsupported(format!(
                "policy store {} does not exist",
                path.display()
            )));
        }
        Ok(Self { path })
    }

    /// Creates a store at `path` seeded with `initial`, overwriting any
    /// existing record.
    pub async fn create<P: AsRef<Path>>(
        path: P,
        initial: IpHandlingPolicy,
    ) -> Result<Self, WebRtcError> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
        };
        store.write_record(initial).await?;
        Ok(store)
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write_record(&self, value: IpHandlingPolicy) -> Result<(), WebRtcError> {
        let body = serde_json::to_vec_pretty(&PolicyRecord { value })?;
        fs::write(&self.path, body).await?;
        debug!(path = %self.path.display(), policy = %value, "wrote policy store");
        Ok(())
    }
}

#[async_trait]
impl PrivacyNetwork for FilePolicyStore {
    async fn ip_handling_policy(&self) -> Result<IpHandlingPolicy, WebRtcError> {
        let body = fs::read(&self.path).await?;
        let record: PolicyRecord = serde_json::from_slice(&body)?;
        Ok(record.value)
    }

    async fn set_ip_handling_policy(&self, policy: IpHandlingPolicy) -> Result<(), WebRtcError> {
        self.write_record(policy).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::webrtc::policy::{enforce_safe_policy, PolicyEnforcement, SAFE_POLICY};

    #[tokio::test]
    async fn test_missing_store_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let result = FilePolicyStore::open(dir.path().join("absent.json")).await;
        assert!(matches!(result, Err(WebRtcError::Unsupported(_))));
    }

    #[tokio::test]
    async fn test_create_open_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.json");

        FilePolicyStore::create(&path, IpHandlingPolicy::Default)
            .await
            .unwrap();
        let store = FilePolicyStore::open(&path).await.unwrap();
        assert_eq!(
            store.ip_handling_policy().await.unwrap(),
            IpHandlingPolicy::Default
        );
    }

    #[tokio::test]
    async fn test_enforcement_persists_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.json");
        let store = FilePolicyStore::create(&path, IpHandlingPolicy::Default)
            .await
            .unwrap();

        let outcome = enforce_safe_policy(&store).await.unwrap();
        assert_eq!(
            outcome,
            PolicyEnforcement::Tightened {
                previous: IpHandlingPolicy::Default
            }
        );

        let reopened = FilePolicyStore::open(&path).await.unwrap();
        assert_eq!(reopened.ip_handling_policy().await.unwrap(), SAFE_POLICY);
    }

    #[tokio::test]
    async fn test_malformed_store_surfaces_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.json");
        tokio::fs::write(&path, b"{\"value\": \"anything_goes\"}")
            .await
            .unwrap();

        let store = FilePolicyStore::open(&path).await.unwrap();
        assert!(matches!(
            store.ip_handling_policy().await,
            Err(WebRtcError::Malformed(_))
        ));
    }
}
