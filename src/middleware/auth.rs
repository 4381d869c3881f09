use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::error::AppError;
use crate::models::User;
use crate::repositories::UserRepository;
use crate::token::TokenKeys;

/// Everything needed to resolve a bearer token, installed as an `Extension`.
#[derive(Clone)]
pub struct Authenticator {
    pub keys: TokenKeys,
    pub user_repo: UserRepository,
}

impl Authenticator {
    pub fn new(keys: TokenKeys, user_repo: UserRepository) -> Self {
        Self { keys, user_repo }
    }

    pub async fn authenticate(&self, token: &str) -> Result<User, AppError> {
        let claims = self.keys.verify(token)?;
        let user_id = claims
            .user_id()
            .ok_or_else(|| AppError::Unauthorized("Token not valid".to_string()))?;

        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

        if user.email != claims.email {
            return Err(AppError::Unauthorized("Token not valid".to_string()));
        }

        Ok(user)
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// The user behind the request's bearer token, as loaded during authentication.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user: User,
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self { user }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let authenticator = parts
            .extensions
            .get::<Authenticator>()
            .cloned()
            .ok_or_else(|| AppError::Internal("Authenticator extension missing".to_string()))?;

        let token = bearer_token(parts).ok_or_else(|| {
            tracing::debug!("Request without bearer token: {}", parts.uri.path());
            AppError::Unauthorized("Unauthorized".to_string())
        })?;

        let user = authenticator.authenticate(token).await?;
        Ok(user.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;
    use crate::migrations::run_migrations_for_tests;
    use axum::http::{Request, StatusCode};

    fn parts_with(auth: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/v1/workouts");
        if let Some(value) = auth {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_token_extracts_token() {
        let parts = parts_with(Some("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&parts), Some("abc.def.ghi"));

        let parts = parts_with(Some("bearer abc"));
        assert_eq!(bearer_token(&parts), Some("abc"));
    }

    #[test]
    fn test_bearer_token_rejects_other_schemes() {
        assert_eq!(bearer_token(&parts_with(None)), None);
        assert_eq!(bearer_token(&parts_with(Some("Basic dXNlcjpwYXNz"))), None);
        assert_eq!(bearer_token(&parts_with(Some("Bearer "))), None);
        assert_eq!(bearer_token(&parts_with(Some("abc"))), None);
    }

    #[tokio::test]
    async fn test_authenticate_returns_stored_user() {
        let pool = create_memory_pool().expect("Failed to create test database");
        run_migrations_for_tests(&pool).expect("Failed to run migrations");
        let user_repo = UserRepository::new(pool);
        let user = user_repo
            .create("lifter@example.com", "lifter", "password123")
            .await
            .unwrap();
        let keys = TokenKeys::new("secret", 7);
        let authenticator = Authenticator::new(keys.clone(), user_repo.clone());

        let token = keys.issue(&user).unwrap();
        let auth_user = AuthUser::from(authenticator.authenticate(&token).await.unwrap());
        assert_eq!(auth_user.user.id, user.id);
        assert_eq!(auth_user.user.username, "lifter");

        assert!(user_repo.delete(user.id).await.unwrap());
        let err = authenticator.authenticate(&token).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }
}
