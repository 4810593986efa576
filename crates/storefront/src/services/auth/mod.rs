//! Authentication service.
//!
//! Credentials accounts: registration with first/last name, email, and
//! password, and sign-in by email and password.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::Deserialize;

use emerald_core::Email;

use crate::db::{RepositoryError, UserDirectory};
use crate::models::{AuthorizedUser, NewUser, User};

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Registration form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Authentication service over a user directory.
#[derive(Debug, Clone)]
pub struct AuthService<D> {
    users: D,
}

impl<D: UserDirectory> AuthService<D> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(users: D) -> Self {
        Self { users }
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField` if any field is blank.
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn register(&self, form: Registration) -> Result<User, AuthError> {
        let first_name = required("firstName", &form.first_name)?;
        let last_name = required("lastName", &form.last_name)?;
        required("email", &form.email)?;
        if form.password.is_empty() {
            return Err(AuthError::MissingField("password"));
        }

        let email = Email::parse(&form.email)?;
        validate_password(&form.password)?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthError::UserAlreadyExists);
        }

        let password_hash = hash_password(&form.password)?;

        // A concurrent registration can still win the race; the unique index catches it.
        let user = self
            .users
            .insert(NewUser {
                first_name: first_name.to_owned(),
                last_name: last_name.to_owned(),
                email,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Check an email/password pair.
    ///
    /// Returns `None` for malformed input, unknown emails, and wrong
    /// passwords alike.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the lookup fails.
    pub async fn authorize(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<AuthorizedUser>, AuthError> {
        let Ok(email) = Email::parse(email) else {
            return Ok(None);
        };
        if validate_password(password).is_err() {
            return Ok(None);
        }

        let Some(record) = self.users.find_by_email(&email).await? else {
            tracing::debug!("Sign-in for unknown email");
            return Ok(None);
        };

        if verify_password(password, &record.password_hash).is_err() {
            tracing::debug!(user_id = %record.user.id, "Sign-in with wrong password");
            return Ok(None);
        }

        Ok(Some(AuthorizedUser::from(record.user)))
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, AuthError> {
    let value = value.trim();
    if value.is_empty() {
        Err(AuthError::MissingField(field))
    } else {
        Ok(value)
    }
}

fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use chrono::Utc;
    use emerald_core::UserId;

    use super::*;
    use crate::models::UserRecord;

    #[derive(Default)]
    struct InMemoryUsers {
        records: Mutex<Vec<UserRecord>>,
    }

    impl UserDirectory for InMemoryUsers {
        async fn find_by_email(&self, email: &Email) -> Result<Option<UserRecord>, RepositoryError> {
            Ok(self
                .records
                .lock()
                .unwrap()
                .iter()
                .find(|r| &r.user.email == email)
                .cloned())
        }

        async fn insert(&self, user: NewUser) -> Result<User, RepositoryError> {
            let mut records = self.records.lock().unwrap();
            if records.iter().any(|r| r.user.email == user.email) {
                return Err(RepositoryError::Conflict("email already exists".to_owned()));
            }
            let now = Utc::now();
            let created = User {
                id: UserId::generate(),
                first_name: user.first_name,
                last_name: user.last_name,
                email: user.email,
                created_at: now,
                updated_at: now,
            };
            records.push(UserRecord {
                user: created.clone(),
                password_hash: user.password_hash,
            });
            Ok(created)
        }
    }

    fn form(email: &str, password: &str) -> Registration {
        Registration {
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
        }
    }

    #[tokio::test]
    async fn test_register_then_authorize() {
        let auth = AuthService::new(InMemoryUsers::default());

        let user = auth.register(form("Ada@Example.com", "correct horse")).await.unwrap();
        assert_eq!(user.email.as_str(), "ada@example.com");
        assert_eq!(user.full_name(), "Ada Lovelace");

        let authorized = auth
            .authorize("ada@example.com", "correct horse")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(authorized.id, user.id);
        assert_eq!(authorized.first_name, "Ada");
    }

    #[tokio::test]
    async fn test_password_is_stored_hashed() {
        let users = InMemoryUsers::default();
        let auth = AuthService::new(&users);

        auth.register(form("ada@example.com", "correct horse")).await.unwrap();

        let records = users.records.lock().unwrap();
        assert_ne!(records[0].password_hash, "correct horse");
        assert!(records[0].password_hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_register_rejects_blank_fields() {
        let auth = AuthService::new(InMemoryUsers::default());

        let mut missing_name = form("ada@example.com", "correct horse");
        missing_name.first_name = "  ".to_owned();
        assert!(matches!(
            auth.register(missing_name).await.unwrap_err(),
            AuthError::MissingField("firstName")
        ));

        assert!(matches!(
            auth.register(form("ada@example.com", "")).await.unwrap_err(),
            AuthError::MissingField("password")
        ));
    }

    #[tokio::test]
    async fn test_register_validates_email_and_password() {
        let auth = AuthService::new(InMemoryUsers::default());

        assert!(matches!(
            auth.register(form("not-an-email", "correct horse")).await.unwrap_err(),
            AuthError::InvalidEmail(_)
        ));
        assert!(matches!(
            auth.register(form("ada@example.com", "short")).await.unwrap_err(),
            AuthError::WeakPassword(_)
        ));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let auth = AuthService::new(InMemoryUsers::default());
        auth.register(form("ada@example.com", "correct horse")).await.unwrap();

        let err = auth
            .register(form("ADA@example.com", "another secret"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserAlreadyExists));
    }

    #[tokio::test]
    async fn test_authorize_failures_return_none() {
        let auth = AuthService::new(InMemoryUsers::default());
        auth.register(form("ada@example.com", "correct horse")).await.unwrap();

        assert!(auth.authorize("ada@example.com", "wrong horse").await.unwrap().is_none());
        assert!(auth.authorize("bob@example.com", "correct horse").await.unwrap().is_none());
        assert!(auth.authorize("not-an-email", "correct horse").await.unwrap().is_none());
        assert!(auth.authorize("ada@example.com", "short").await.unwrap().is_none());
    }

    #[test]
    fn test_verify_password_rejects_garbage_hash() {
        assert!(verify_password("correct horse", "not a hash").is_err());
    }
}
