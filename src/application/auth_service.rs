use std::sync::Arc;

use crate::domain::errors::DomainError;
use crate::domain::order::MAX_EMAIL_LEN;
use crate::domain::ports::UserRepository;
use crate::domain::user::User;
use crate::infrastructure::password::PasswordHasher;

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, hasher: PasswordHasher) -> Self {
        Self { users, hasher }
    }

    pub fn register(&self, email: &str, password: &str) -> Result<User, DomainError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(DomainError::InvalidArgument(
                "Email and password are required".into(),
            ));
        }
        if !email.contains('@') {
            return Err(DomainError::InvalidArgument("Invalid email format".into()));
        }
        if email.chars().count() > MAX_EMAIL_LEN {
            return Err(DomainError::InvalidArgument(format!(
                "Email must be at most {MAX_EMAIL_LEN} characters"
            )));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::InvalidArgument(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let hash = self.hasher.hash(password)?;
        let user = self.users.create(email, &hash)?;
        log::info!("Registered user {}", user.id);
        Ok(user)
    }

    /// Unknown email and wrong password are indistinguishable to the caller.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<User, DomainError> {
        let Some(credential) = self.users.find_credential(email.trim())? else {
            self.hasher.verify_decoy(password);
            return Err(DomainError::Unauthenticated);
        };

        if !self.hasher.verify(password, &credential.password_hash) {
            log::info!("Failed login for user {}", credential.user.id);
            return Err(DomainError::Unauthenticated);
        }
        Ok(credential.user)
    }

    /// Resolves the session's user id; a deleted user counts as logged out.
    pub fn current_user(&self, user_id: i32) -> Result<User, DomainError> {
        self.users
            .find_by_id(user_id)?
            .ok_or(DomainError::Unauthenticated)
    }
}
