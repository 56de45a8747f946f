//! Account store and local auth provider backed by sled.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tailorpro_core::{Credentials, RegistrationProfile, Session, UserId};

use super::tokens::SessionTokens;
use crate::error::AuthError;
use crate::traits::AuthProvider;

const CURRENT_SESSION_KEY: &[u8] = b"current";

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique user ID.
    pub id: String,
    /// Login email, lowercased.
    pub email: String,
    /// Argon2 password hash.
    pub password_hash: String,
    /// Full name given at registration.
    pub full_name: String,
    /// Optional phone number.
    pub phone: Option<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the email address was verified.
    pub email_confirmed_at: Option<DateTime<Utc>>,
    /// Link target for the verification email.
    pub verification_redirect: String,
    /// When the account last signed in.
    pub last_sign_in_at: Option<DateTime<Utc>>,
}

impl Account {
    fn new(profile: &RegistrationProfile, redirect_to: &str) -> Result<Self, AuthError> {
        Ok(Self {
            id: format!("user_{}", uuid_v4()),
            email: normalize_email(&profile.email),
            password_hash: hash_password(profile.password.expose_secret())?,
            full_name: profile.full_name.clone(),
            phone: profile.phone.clone(),
            created_at: Utc::now(),
            email_confirmed_at: None,
            verification_redirect: redirect_to.to_string(),
            last_sign_in_at: None,
        })
    }

    /// Whether the email address has been verified.
    #[must_use]
    pub const fn is_confirmed(&self) -> bool {
        self.email_confirmed_at.is_some()
    }
}

/// Email/password auth provider with a single persisted current session.
pub struct LocalAuthProvider {
    accounts: sled::Tree,
    session: sled::Tree,
    tokens: SessionTokens,
}

impl LocalAuthProvider {
    /// Create a provider over an existing sled database.
    ///
    /// # Errors
    ///
    /// Returns error if the trees cannot be opened.
    pub fn with_db(db: &sled::Db, tokens: SessionTokens) -> Result<Self, AuthError> {
        let accounts = db
            .open_tree("accounts")
            .map_err(|e| AuthError::Storage(format!("Failed to open accounts tree: {e}")))?;
        let session = db
            .open_tree("session")
            .map_err(|e| AuthError::Storage(format!("Failed to open session tree: {e}")))?;

        Ok(Self {
            accounts,
            session,
            tokens,
        })
    }

    /// Get an account by ID.
    ///
    /// # Errors
    ///
    /// Returns error if storage fails.
    pub fn get(&self, id: &str) -> Result<Option<Account>, AuthError> {
        match self.accounts.get(id.as_bytes()) {
            Ok(Some(value)) => serde_json::from_slice(&value)
                .map(Some)
                .map_err(|e| AuthError::Storage(format!("Deserialization error: {e}"))),
            Ok(None) => Ok(None),
            Err(e) => Err(AuthError::Storage(format!("Get error: {e}"))),
        }
    }

    /// Get an account by email.
    ///
    /// # Errors
    ///
    /// Returns error if storage fails.
    pub fn get_by_email(&self, email: &str) -> Result<Option<Account>, AuthError> {
        let index_key = email_index_key(email);
        match self.accounts.get(index_key.as_bytes()) {
            Ok(Some(id_bytes)) => {
                let id = String::from_utf8_lossy(&id_bytes);
                self.get(&id)
            }
            Ok(None) => Ok(None),
            Err(e) => Err(AuthError::Storage(format!("Index lookup error: {e}"))),
        }
    }

    /// List all accounts.
    ///
    /// # Errors
    ///
    /// Returns error if storage fails.
    pub fn list(&self) -> Result<Vec<Account>, AuthError> {
        let mut accounts = Vec::new();

        for result in self.accounts.iter() {
            let (key, value) =
                result.map_err(|e| AuthError::Storage(format!("Iter error: {e}")))?;

            if key.starts_with(b"idx:") {
                continue;
            }

            let account: Account = serde_json::from_slice(&value)
                .map_err(|e| AuthError::Storage(format!("Deserialization error: {e}")))?;
            accounts.push(account);
        }

        Ok(accounts)
    }

    /// Mark an account's email as verified.
    ///
    /// Returns the redirect URL recorded at registration.
    ///
    /// # Errors
    ///
    /// Returns error if the account does not exist or storage fails.
    pub fn confirm_email(&self, email: &str) -> Result<String, AuthError> {
        let mut account = self
            .get_by_email(email)?
            .ok_or_else(|| AuthError::Rejected(format!("No account for {email}")))?;

        if account.email_confirmed_at.is_none() {
            account.email_confirmed_at = Some(Utc::now());
            self.put(&account)?;
        }

        Ok(account.verification_redirect)
    }

    fn create(&self, account: &Account) -> Result<(), AuthError> {
        let index_key = email_index_key(&account.email);

        if let Err(conflict) = self.claim_email(&index_key, None, &account.id)? {
            // An index entry whose account record is missing is left over
            // from an interrupted create and may be taken over.
            let Some(owner) = conflict.current else {
                return Err(AuthError::UserExists);
            };
            if self.get(&String::from_utf8_lossy(&owner))?.is_some() {
                return Err(AuthError::UserExists);
            }
            tracing::warn!(email = %account.email, "Reclaiming email index entry with no account");
            if self
                .claim_email(&index_key, Some(&owner[..]), &account.id)?
                .is_err()
            {
                return Err(AuthError::UserExists);
            }
        }

        if let Err(e) = self.put(account) {
            self.release_email(&index_key, &account.id);
            return Err(e);
        }
        Ok(())
    }

    fn claim_email(
        &self,
        index_key: &str,
        current: Option<&[u8]>,
        id: &str,
    ) -> Result<Result<(), sled::CompareAndSwapError>, AuthError> {
        self.accounts
            .compare_and_swap(index_key.as_bytes(), current, Some(id.as_bytes()))
            .map_err(|e| AuthError::Storage(format!("Index error: {e}")))
    }

    fn release_email(&self, index_key: &str, id: &str) {
        let released = self.accounts.compare_and_swap(
            index_key.as_bytes(),
            Some(id.as_bytes()),
            None::<&[u8]>,
        );
        if let Err(e) = released {
            tracing::warn!(error = %e, "Failed to release email index entry");
        }
    }

    fn put(&self, account: &Account) -> Result<(), AuthError> {
        let value = serde_json::to_vec(account)
            .map_err(|e| AuthError::Storage(format!("Serialization error: {e}")))?;

        self.accounts
            .insert(account.id.as_bytes(), value)
            .map_err(|e| AuthError::Storage(format!("Insert error: {e}")))?;

        self.accounts
            .flush()
            .map_err(|e| AuthError::Storage(format!("Flush error: {e}")))?;

        Ok(())
    }

    fn clear_session(&self) -> Result<(), AuthError> {
        self.session
            .remove(CURRENT_SESSION_KEY)
            .map_err(|e| AuthError::Storage(format!("Session remove error: {e}")))?;
        self.session
            .flush()
            .map_err(|e| AuthError::Storage(format!("Flush error: {e}")))?;
        Ok(())
    }
}

#[async_trait]
impl AuthProvider for LocalAuthProvider {
    async fn get_session(&self) -> Result<Option<Session>, AuthError> {
        let token = match self.session.get(CURRENT_SESSION_KEY) {
            Ok(Some(bytes)) => String::from_utf8_lossy(&bytes).into_owned(),
            Ok(None) => return Ok(None),
            Err(e) => return Err(AuthError::Storage(format!("Session read error: {e}"))),
        };

        match self.tokens.validate(&token) {
            Ok(claims) => Ok(Some(Session {
                token: SecretString::new(token.into_boxed_str()),
                user_id: UserId::new(claims.sub),
            })),
            Err(e) => {
                tracing::debug!(error = %e, "Discarding stale session token");
                self.clear_session()?;
                Ok(None)
            }
        }
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<UserId, AuthError> {
        let mut account = self
            .get_by_email(&credentials.email)?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(credentials.password.expose_secret(), &account.password_hash)?;

        if !account.is_confirmed() {
            return Err(AuthError::Rejected("Email not confirmed".to_string()));
        }

        let (token, _) = self.tokens.issue(&account.id, &account.email)?;
        account.last_sign_in_at = Some(Utc::now());
        self.put(&account)?;

        // Must remain the last write: any error above leaves no session stored.
        self.session
            .insert(CURRENT_SESSION_KEY, token.as_bytes())
            .map_err(|e| AuthError::Storage(format!("Session write error: {e}")))?;
        self.session
            .flush()
            .map_err(|e| AuthError::Storage(format!("Flush error: {e}")))?;

        Ok(UserId::new(account.id))
    }

    async fn sign_up(
        &self,
        profile: &RegistrationProfile,
        redirect_to: &str,
    ) -> Result<Option<UserId>, AuthError> {
        let account = Account::new(profile, redirect_to)?;
        self.create(&account)?;
        tracing::debug!(user_id = %account.id, redirect_to, "Account created, verification pending");
        Ok(Some(UserId::new(account.id)))
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.clear_session()
    }
}

impl std::fmt::Debug for LocalAuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalAuthProvider")
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn email_index_key(email: &str) -> String {
    format!("idx:email:{}", normalize_email(email))
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::Storage(format!("Password hashing failed: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AuthError::Storage(format!("Invalid hash: {e}")))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

/// Generate a random UUID v4 string.
fn uuid_v4() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);

    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    let hex = hex::encode(bytes);
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    fn provider(dir: &TempDir) -> LocalAuthProvider {
        let db = sled::open(dir.path().join("auth")).unwrap();
        let tokens = SessionTokens::new(b"0123456789abcdef0123456789abcdef", Duration::from_secs(3600));
        LocalAuthProvider::with_db(&db, tokens).unwrap()
    }

    fn profile(email: &str) -> RegistrationProfile {
        RegistrationProfile::new(email, "secret1", "Ada Lovelace", None)
    }

    #[tokio::test]
    async fn test_sign_up_then_sign_in_after_confirmation() {
        let dir = TempDir::new().unwrap();
        let provider = provider(&dir);

        let id = provider
            .sign_up(&profile("Ada@Example.com"), "http://localhost:8080/user/dashboard")
            .await
            .unwrap()
            .unwrap();
        assert!(id.as_ref().starts_with("user_"));

        let creds = Credentials::new("ada@example.com", "secret1");
        let err = provider.sign_in(&creds).await.unwrap_err();
        assert_eq!(err.to_string(), "Email not confirmed");

        let redirect = provider.confirm_email("ada@example.com").unwrap();
        assert_eq!(redirect, "http://localhost:8080/user/dashboard");

        let signed_in = provider.sign_in(&creds).await.unwrap();
        assert_eq!(signed_in, id);

        let session = provider.get_session().await.unwrap().unwrap();
        assert_eq!(session.user_id, id);
        assert!(provider.get(id.as_ref()).unwrap().unwrap().last_sign_in_at.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let dir = TempDir::new().unwrap();
        let provider = provider(&dir);

        provider.sign_up(&profile("a@b.com"), "x").await.unwrap();
        let result = provider.sign_up(&profile("A@B.com"), "x").await;
        assert_eq!(result.unwrap_err(), AuthError::UserExists);
        assert_eq!(provider.list().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email() {
        let dir = TempDir::new().unwrap();
        let provider = provider(&dir);
        provider.sign_up(&profile("a@b.com"), "x").await.unwrap();
        provider.confirm_email("a@b.com").unwrap();

        let wrong = Credentials::new("a@b.com", "secret2");
        assert_eq!(provider.sign_in(&wrong).await.unwrap_err(), AuthError::InvalidCredentials);

        let unknown = Credentials::new("z@b.com", "secret1");
        assert_eq!(provider.sign_in(&unknown).await.unwrap_err(), AuthError::InvalidCredentials);
        assert!(provider.get_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sign_out_clears_session() {
        let dir = TempDir::new().unwrap();
        let provider = provider(&dir);
        provider.sign_up(&profile("a@b.com"), "x").await.unwrap();
        provider.confirm_email("a@b.com").unwrap();
        provider.sign_in(&Credentials::new("a@b.com", "secret1")).await.unwrap();

        provider.sign_out().await.unwrap();
        assert!(provider.get_session().await.unwrap().is_none());
        // Signing out twice is harmless.
        provider.sign_out().await.unwrap();
    }

    #[tokio::test]
    async fn test_stale_token_discarded() {
        let dir = TempDir::new().unwrap();
        let provider = provider(&dir);
        provider
            .session
            .insert(CURRENT_SESSION_KEY, b"garbage".as_slice())
            .unwrap();

        assert!(provider.get_session().await.unwrap().is_none());
        assert!(provider.session.get(CURRENT_SESSION_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failed_sign_in_leaves_no_session() {
        let dir = TempDir::new().unwrap();
        let db = sled::open(dir.path().join("auth")).unwrap();
        let tokens = SessionTokens::new(
            b"0123456789abcdef0123456789abcdef",
            Duration::from_secs(10_000_000_000 * 3600),
        );
        let provider = LocalAuthProvider::with_db(&db, tokens).unwrap();
        provider.sign_up(&profile("a@b.com"), "x").await.unwrap();
        provider.confirm_email("a@b.com").unwrap();

        let err = provider
            .sign_in(&Credentials::new("a@b.com", "secret1"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::Token(_)));
        assert!(provider.session.get(CURRENT_SESSION_KEY).unwrap().is_none());
        let account = provider.get_by_email("a@b.com").unwrap().unwrap();
        assert!(account.last_sign_in_at.is_none());
    }

    #[tokio::test]
    async fn test_orphaned_email_index_is_reclaimed() {
        let dir = TempDir::new().unwrap();
        let provider = provider(&dir);
        provider
            .accounts
            .insert(email_index_key("a@b.com").as_bytes(), b"user_gone".as_slice())
            .unwrap();
        assert!(provider.get_by_email("a@b.com").unwrap().is_none());

        let id = provider.sign_up(&profile("a@b.com"), "x").await.unwrap().unwrap();

        let account = provider.get_by_email("a@b.com").unwrap().unwrap();
        assert_eq!(account.id, id.as_ref());
        let again = provider.sign_up(&profile("a@b.com"), "x").await;
        assert_eq!(again.unwrap_err(), AuthError::UserExists);
    }

    #[test]
    fn test_released_email_index_can_be_claimed() {
        let dir = TempDir::new().unwrap();
        let provider = provider(&dir);
        let key = email_index_key("a@b.com");

        provider.claim_email(&key, None, "user_1").unwrap().unwrap();
        provider.release_email(&key, "user_2");
        assert!(provider.claim_email(&key, None, "user_3").unwrap().is_err());

        provider.release_email(&key, "user_1");
        provider.claim_email(&key, None, "user_3").unwrap().unwrap();
    }

    #[test]
    fn test_uuid_format() {
        let id = uuid_v4();
        assert_eq!(id.len(), 36);
        assert_eq!(&id[14..15], "4");
    }
}
