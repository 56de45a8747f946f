//! Role directory backed by sled.

use async_trait::async_trait;
use tailorpro_core::{Role, RoleRecord, UserId};

use crate::error::{DirectoryError, RoleLookupError};
use crate::traits::RoleDirectory;

/// Role records keyed by user ID, one record per identity.
pub struct SledRoleDirectory {
    tree: sled::Tree,
}

impl SledRoleDirectory {
    /// Create a directory over an existing sled database.
    ///
    /// # Errors
    ///
    /// Returns error if the tree cannot be opened.
    pub fn with_db(db: &sled::Db) -> Result<Self, DirectoryError> {
        let tree = db
            .open_tree("user_roles")
            .map_err(|e| DirectoryError::Storage(format!("Failed to open roles tree: {e}")))?;
        Ok(Self { tree })
    }

    /// List every stored record as raw `(user_id, role)` pairs.
    ///
    /// Values are returned as stored, including unrecognized ones.
    ///
    /// # Errors
    ///
    /// Returns error if storage fails.
    pub fn list(&self) -> Result<Vec<(UserId, String)>, DirectoryError> {
        self.tree
            .iter()
            .map(|entry| {
                let (key, value) =
                    entry.map_err(|e| DirectoryError::Storage(format!("Iter error: {e}")))?;
                Ok((
                    UserId::new(String::from_utf8_lossy(&key)),
                    String::from_utf8_lossy(&value).into_owned(),
                ))
            })
            .collect()
    }

    /// Overwrite the role of an identity.
    ///
    /// Operator repair only; the sign-in and sign-up flows never call this.
    ///
    /// # Errors
    ///
    /// Returns error if storage fails.
    pub fn repair(&self, user_id: &UserId, role: Role) -> Result<Option<String>, DirectoryError> {
        let previous = self
            .tree
            .insert(user_id.as_ref().as_bytes(), role.as_str().as_bytes())
            .map_err(|e| DirectoryError::Storage(format!("Insert error: {e}")))?;
        self.flush()?;

        tracing::info!(user_id = %user_id, role = %role, "Role record repaired");
        Ok(previous.map(|v| String::from_utf8_lossy(&v).into_owned()))
    }

    fn flush(&self) -> Result<(), DirectoryError> {
        self.tree
            .flush()
            .map(|_| ())
            .map_err(|e| DirectoryError::Storage(format!("Flush error: {e}")))
    }
}

#[async_trait]
impl RoleDirectory for SledRoleDirectory {
    async fn get_role(&self, user_id: &UserId) -> Result<RoleRecord, RoleLookupError> {
        let value = self
            .tree
            .get(user_id.as_ref().as_bytes())
            .map_err(|e| RoleLookupError::Directory(format!("Get error: {e}")))?
            .ok_or_else(|| RoleLookupError::NotFound(user_id.clone()))?;

        let raw = String::from_utf8_lossy(&value);
        let role = raw
            .parse::<Role>()
            .map_err(|_| RoleLookupError::Unrecognized(raw.to_string()))?;

        Ok(RoleRecord {
            user_id: user_id.clone(),
            role,
        })
    }

    async fn insert_role(&self, user_id: &UserId, role: Role) -> Result<(), DirectoryError> {
        let swapped = self
            .tree
            .compare_and_swap(
                user_id.as_ref().as_bytes(),
                None::<&[u8]>,
                Some(role.as_str().as_bytes()),
            )
            .map_err(|e| DirectoryError::Storage(format!("Insert error: {e}")))?;

        if swapped.is_err() {
            return Err(DirectoryError::AlreadyAssigned(user_id.clone()));
        }

        self.flush()
    }
}

impl std::fmt::Debug for SledRoleDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SledRoleDirectory")
            .field("records", &self.tree.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn open(dir: &TempDir) -> (sled::Db, SledRoleDirectory) {
        let db = sled::open(dir.path().join("roles")).unwrap();
        let directory = SledRoleDirectory::with_db(&db).unwrap();
        (db, directory)
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let dir = TempDir::new().unwrap();
        let (_db, directory) = open(&dir);
        let id = UserId::new("user_1");

        directory.insert_role(&id, Role::Staff).await.unwrap();
        let record = directory.get_role(&id).await.unwrap();
        assert_eq!(
            record,
            RoleRecord {
                user_id: id,
                role: Role::Staff
            }
        );
    }

    #[tokio::test]
    async fn test_second_insert_rejected() {
        let dir = TempDir::new().unwrap();
        let (_db, directory) = open(&dir);
        let id = UserId::new("user_1");

        directory.insert_role(&id, Role::Customer).await.unwrap();
        let err = directory.insert_role(&id, Role::Staff).await.unwrap_err();
        assert_eq!(err, DirectoryError::AlreadyAssigned(id.clone()));
        assert_eq!(directory.get_role(&id).await.unwrap().role, Role::Customer);
    }

    #[tokio::test]
    async fn test_missing_role() {
        let dir = TempDir::new().unwrap();
        let (_db, directory) = open(&dir);
        let id = UserId::new("ghost");

        let err = directory.get_role(&id).await.unwrap_err();
        assert_eq!(err, RoleLookupError::NotFound(id));
    }

    #[tokio::test]
    async fn test_unrecognized_role() {
        let dir = TempDir::new().unwrap();
        let (db, directory) = open(&dir);
        db.open_tree("user_roles")
            .unwrap()
            .insert(b"user_1", b"owner".as_slice())
            .unwrap();

        let err = directory.get_role(&UserId::new("user_1")).await.unwrap_err();
        assert_eq!(err, RoleLookupError::Unrecognized("owner".to_string()));
    }

    #[tokio::test]
    async fn test_repair_overwrites() {
        let dir = TempDir::new().unwrap();
        let (_db, directory) = open(&dir);
        let id = UserId::new("user_1");

        assert_eq!(directory.repair(&id, Role::Deliverer).unwrap(), None);
        assert_eq!(
            directory.repair(&id, Role::Staff).unwrap(),
            Some("deliverer".to_string())
        );
        assert_eq!(
            directory.list().unwrap(),
            vec![(id, "staff".to_string())]
        );
    }
}
