use chrono::{DateTime, Utc};

/// A registered user. The stored credential hash never leaves the repository
/// layer except through [`StoredCredential`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The user row together with its PHC-format password hash, used only for
/// verification.
#[derive(Clone)]
pub struct StoredCredential {
    pub user: User,
    pub password_hash: String,
}

impl std::fmt::Debug for StoredCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredCredential")
            .field("user", &self.user)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}
