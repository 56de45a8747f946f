//! Local provider and directory over one sled database.
//!
//! Used by the command-line host. Accounts, the current session, and role
//! records live in separate trees of the same database.

mod accounts;
mod roles;
mod tokens;

pub use accounts::{Account, LocalAuthProvider};
pub use roles::SledRoleDirectory;
pub use tokens::{Claims, SessionTokens};

use std::path::Path;
use std::sync::Arc;

use tailorpro_core::config::SessionConfig;

use crate::error::AuthError;

const JWT_SECRET_KEY: &[u8] = b"jwt_secret";

/// The local auth provider and role directory sharing one database.
#[derive(Debug, Clone)]
pub struct LocalBackend {
    /// Account store and session owner.
    pub provider: Arc<LocalAuthProvider>,
    /// Role records.
    pub directory: Arc<SledRoleDirectory>,
}

impl LocalBackend {
    /// Open or create the local stores under `path`.
    ///
    /// Uses the configured JWT secret, or a generated one persisted in the
    /// database on first use.
    ///
    /// # Errors
    ///
    /// Returns error if the database cannot be opened or the secret is invalid.
    pub fn open(path: &Path, session: &SessionConfig) -> Result<Self, AuthError> {
        let db = sled::open(path.join("auth"))
            .map_err(|e| AuthError::Storage(format!("Failed to open auth database: {e}")))?;

        let secret = match &session.jwt_secret {
            Some(secret) => secret.clone(),
            None => stored_secret(&db)?,
        };
        let tokens = SessionTokens::from_hex_secret(&secret, session.token_expiry())?;

        let provider = LocalAuthProvider::with_db(&db, tokens)?;
        let directory =
            SledRoleDirectory::with_db(&db).map_err(|e| AuthError::Storage(e.to_string()))?;

        Ok(Self {
            provider: Arc::new(provider),
            directory: Arc::new(directory),
        })
    }
}

fn stored_secret(db: &sled::Db) -> Result<String, AuthError> {
    let meta = db
        .open_tree("meta")
        .map_err(|e| AuthError::Storage(format!("Failed to open meta tree: {e}")))?;

    if let Some(value) = meta
        .get(JWT_SECRET_KEY)
        .map_err(|e| AuthError::Storage(format!("Get error: {e}")))?
    {
        return Ok(String::from_utf8_lossy(&value).into_owned());
    }

    let secret = SessionTokens::generate_hex_secret();
    meta.insert(JWT_SECRET_KEY, secret.as_bytes())
        .map_err(|e| AuthError::Storage(format!("Insert error: {e}")))?;
    meta.flush()
        .map_err(|e| AuthError::Storage(format!("Flush error: {e}")))?;
    tracing::debug!("Generated session signing secret");

    Ok(secret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{AuthProvider, RoleDirectory};
    use tailorpro_core::{Credentials, RegistrationProfile, Role};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_session_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let config = SessionConfig::default();

        let user_id = {
            let backend = LocalBackend::open(dir.path(), &config).unwrap();
            let profile = RegistrationProfile::new("a@b.com", "secret1", "Ada", None);
            let id = backend.provider.sign_up(&profile, "x").await.unwrap().unwrap();
            backend.directory.insert_role(&id, Role::Customer).await.unwrap();
            backend.provider.confirm_email("a@b.com").unwrap();
            backend
                .provider
                .sign_in(&Credentials::new("a@b.com", "secret1"))
                .await
                .unwrap()
        };

        let backend = LocalBackend::open(dir.path(), &config).unwrap();
        let session = backend.provider.get_session().await.unwrap().unwrap();
        assert_eq!(session.user_id, user_id);
        assert_eq!(
            backend.directory.get_role(&user_id).await.unwrap().role,
            Role::Customer
        );
    }
}
