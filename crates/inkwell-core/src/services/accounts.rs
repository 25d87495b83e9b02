//! Registration, login and the current-user lookup.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::User;
use crate::error::{DomainError, DomainResult};
use crate::ports::{BaseRepository, PasswordService, TokenService};

use super::Repositories;

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// A user together with a freshly issued bearer token.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub token: String,
    pub expires_in: i64,
}

#[derive(Clone)]
pub struct AccountService {
    repos: Repositories,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
}

fn validate_username(username: &str) -> DomainResult<()> {
    let len = username.chars().count();
    if !(3..=32).contains(&len) {
        return Err(DomainError::validation(
            "username must be between 3 and 32 characters",
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(DomainError::validation(
            "username may only contain letters, digits, '_' and '-'",
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> DomainResult<()> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(DomainError::validation("Invalid email address"))
    }
}

impl AccountService {
    pub fn new(
        repos: Repositories,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            repos,
            passwords,
            tokens,
        }
    }

    fn issue(&self, user: User) -> DomainResult<Session> {
        let token = self
            .tokens
            .generate_token(user.id, &user.username)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        Ok(Session {
            user,
            token,
            expires_in: self.tokens.expiration_seconds(),
        })
    }

    pub async fn register(&self, input: Registration) -> DomainResult<Session> {
        let username = input.username.trim().to_string();
        let email = input.email.trim().to_string();

        validate_username(&username)?;
        validate_email(&email)?;
        if input.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::validation(
                "Password must be at least 8 characters",
            ));
        }

        // Friendly messages for the common case; the unique indexes catch races.
        if self.repos.users.find_by_email(&email).await?.is_some() {
            return Err(DomainError::Conflict("Email already in use".to_string()));
        }
        if self.repos.users.find_by_username(&username).await?.is_some() {
            return Err(DomainError::Conflict("Username already in use".to_string()));
        }

        let password_hash = self.passwords.hash(&input.password)?;
        let user = self
            .repos
            .users
            .insert(User::new(username, email, password_hash))
            .await?;

        tracing::info!(user_id = %user.id, "User registered");
        self.issue(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> DomainResult<Session> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(DomainError::validation("Email and password required"));
        }

        let invalid = || DomainError::Unauthenticated("Invalid credentials".to_string());

        let user = self
            .repos
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(invalid)?;

        if !self.passwords.verify(password, &user.password_hash)? {
            tracing::debug!(user_id = %user.id, "Password mismatch");
            return Err(invalid());
        }

        self.issue(user)
    }

    /// The user behind an authenticated identity.
    pub async fn me(&self, user_id: Uuid) -> DomainResult<User> {
        self.repos
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("al_ice-99").is_ok());
        assert!(validate_username("al").is_err());
        assert!(validate_username("alice smith").is_err());
        assert!(validate_username(&"a".repeat(33)).is_err());
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("a@x.com").is_ok());
        assert!(validate_email("ax.com").is_err());
        assert!(validate_email("@x.com").is_err());
        assert!(validate_email("a@").is_err());
        assert!(validate_email("a@b@c").is_err());
        assert!(validate_email("a b@x.com").is_err());
    }
}
