//! crates/reading_tracker_core/src/services/auth.rs
//!
//! Registration, login and bearer-token authentication.

use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::{AuthOutcome, NewUser, Role, User};
use crate::ports::{PasswordHasher, PortError, PortResult, TokenService, UserRepository};

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Creates a `USER` account and signs a token for it.
    pub async fn register(&self, email: &str, password: &str) -> PortResult<AuthOutcome> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(PortError::AlreadyExists("User already exist".to_string()));
        }
        let user = self.create_user(email, password, Role::User).await?;
        let token = self.tokens.issue(&user)?;
        info!(user_id = %user.id, "Registered new user");
        Ok(AuthOutcome { user, token })
    }

    pub async fn login(&self, email: &str, password: &str) -> PortResult<AuthOutcome> {
        let hashed_password = self.hasher.hash(password)?;
        let credentials = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(PortError::InvalidCredentials)?;

        // Exact match on the derived hash.
        if credentials.hashed_password != hashed_password {
            warn!(user_id = %credentials.user.id, "Login rejected: password mismatch");
            return Err(PortError::InvalidCredentials);
        }

        let token = self.tokens.issue(&credentials.user)?;
        Ok(AuthOutcome {
            user: credentials.user,
            token,
        })
    }

    /// Resolves a raw bearer token to the live user it names.
    pub async fn authenticate(&self, token: &str) -> PortResult<User> {
        let claims = self.tokens.verify(token)?;
        self.users
            .find_by_id(claims.subject)
            .await?
            .ok_or(PortError::Unauthorized)
    }

    /// Makes sure an administrator account exists for `email`. An existing
    /// account is returned untouched, whatever its role.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> PortResult<User> {
        if let Some(existing) = self.users.find_by_email(email).await? {
            return Ok(existing.user);
        }
        let admin = self.create_user(email, password, Role::Admin).await?;
        info!(user_id = %admin.id, "Seeded administrator account");
        Ok(admin)
    }

    async fn create_user(&self, email: &str, password: &str, role: Role) -> PortResult<User> {
        let hashed_password = self.hasher.hash(password)?;
        self.users
            .create(NewUser {
                email: email.to_string(),
                hashed_password,
                role,
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccessToken, TokenClaims};
    use crate::memory::InMemoryStore;
    use uuid::Uuid;

    struct ReversingHasher;

    impl PasswordHasher for ReversingHasher {
        fn hash(&self, password: &str) -> PortResult<String> {
            Ok(password.chars().rev().collect())
        }
    }

    /// Tokens of the form `<user id>:<role>`.
    struct PlainTokens;

    impl TokenService for PlainTokens {
        fn issue(&self, user: &User) -> PortResult<AccessToken> {
            Ok(AccessToken {
                access_token: format!("{}:{}", user.id, user.role),
                expires_in: 60,
            })
        }

        fn verify(&self, token: &str) -> PortResult<TokenClaims> {
            let (subject, role) = token.split_once(':').ok_or(PortError::Unauthorized)?;
            Ok(TokenClaims {
                subject: subject.parse().map_err(|_| PortError::Unauthorized)?,
                role: role.parse().map_err(|_| PortError::Unauthorized)?,
            })
        }
    }

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(InMemoryStore::new()),
            Arc::new(ReversingHasher),
            Arc::new(PlainTokens),
        )
    }

    #[tokio::test]
    async fn registering_twice_fails_the_second_time() {
        let auth = service();
        let first = auth.register("octane@example.com", "Octane@123").await.unwrap();
        assert_eq!(first.user.role, Role::User);

        let err = auth
            .register("octane@example.com", "Other@1234")
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn login_checks_the_derived_hash() {
        let auth = service();
        auth.register("octane@example.com", "Octane@123").await.unwrap();

        let ok = auth.login("octane@example.com", "Octane@123").await.unwrap();
        assert_eq!(ok.user.email, "octane@example.com");

        let wrong_password = auth.login("octane@example.com", "nope").await.unwrap_err();
        assert_eq!(wrong_password, PortError::InvalidCredentials);

        let unknown = auth.login("ghost@example.com", "Octane@123").await.unwrap_err();
        assert_eq!(unknown, PortError::InvalidCredentials);
    }

    #[tokio::test]
    async fn authenticate_resolves_the_token_subject() {
        let auth = service();
        let outcome = auth.register("octane@example.com", "Octane@123").await.unwrap();
        let user = auth.authenticate(&outcome.token.access_token).await.unwrap();
        assert_eq!(user, outcome.user);

        let stranger = format!("{}:USER", Uuid::new_v4());
        assert_eq!(auth.authenticate(&stranger).await.unwrap_err(), PortError::Unauthorized);
        assert_eq!(auth.authenticate("garbage").await.unwrap_err(), PortError::Unauthorized);
    }

    #[tokio::test]
    async fn ensure_admin_is_idempotent() {
        let auth = service();
        let first = auth.ensure_admin("admin@example.com", "Admin@1234").await.unwrap();
        assert_eq!(first.role, Role::Admin);
        let second = auth.ensure_admin("admin@example.com", "Admin@1234").await.unwrap();
        assert_eq!(first.id, second.id);
    }
}
