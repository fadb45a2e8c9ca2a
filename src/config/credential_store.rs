use crate::domain::model::SigningIdentity;
use crate::domain::ports::CredentialStore;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// 以檔案保存已註冊身份，每個身份一個 JSON 檔
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    base_path: PathBuf,
}

impl FileCredentialStore {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    pub fn identity_path(&self, user: &str, msp_id: &str) -> PathBuf {
        self.base_path.join(format!("{}@{}.json", user, msp_id))
    }
}

impl CredentialStore for FileCredentialStore {
    async fn load_identity(&self, user: &str, msp_id: &str) -> Result<Option<SigningIdentity>> {
        let full_path = self.identity_path(user, msp_id);

        match tokio::fs::read(&full_path).await {
            Ok(data) => {
                let identity: SigningIdentity = serde_json::from_slice(&data)?;
                Ok(Some(identity))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn store_identity(&self, identity: &SigningIdentity) -> Result<()> {
        let full_path = self.identity_path(&identity.user, &identity.msp_id);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let data = serde_json::to_vec_pretty(identity)?;
        tokio::fs::write(&full_path, data).await?;
        tracing::debug!("Stored identity at {}", full_path.display());
        Ok(())
    }
}
