/*!
 * # Authentication and Authorization Module
 *
 * Users authenticate with a username and password and receive an HS256 JWT.
 * The token carries the user's single role, which the permission middleware
 * checks against the action a route group performs (see [`rbac`]).
 */

use crate::errors::{ErrorResponse, ServiceError};
use crate::handlers::common::JsonBody;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::{DefaultBodyLimit, Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

pub mod rbac;
pub mod user;

pub use rbac::{authorize, Action, Role};

/// Claim structure for JWT tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,      // Subject (user ID)
    pub username: String, // Login name
    pub name: String,     // Display name
    pub role: String,     // Role name
    pub jti: String,      // JWT ID
    pub iat: i64,         // Issued at time
    pub exp: i64,         // Expiration time
    pub nbf: i64,         // Not valid before time
    pub iss: String,      // Issuer
    pub aud: String,      // Audience
}

/// Authenticated user data extracted from the JWT token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub username: String,
    pub display_name: String,
    pub role: Role,
    #[serde(skip)]
    pub token_id: String,
}

impl AuthUser {
    pub fn can(&self, action: Action) -> bool {
        authorize(self.role, action)
    }
}

/// Authentication configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_audience: String,
    pub jwt_issuer: String,
    pub access_token_expiration: Duration,
}

impl AuthConfig {
    pub fn new(
        jwt_secret: String,
        jwt_audience: String,
        jwt_issuer: String,
        access_token_expiration: Duration,
    ) -> Self {
        Self {
            jwt_secret,
            jwt_audience,
            jwt_issuer,
            access_token_expiration,
        }
    }

    pub fn from_app_config(cfg: &crate::config::AppConfig) -> Self {
        Self::new(
            cfg.jwt_secret.clone(),
            cfg.auth_audience.clone(),
            cfg.auth_issuer.clone(),
            Duration::from_secs(cfg.jwt_expiration as u64),
        )
    }
}

/// Account to create when bootstrapping users
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub display_name: String,
    pub email: Option<String>,
    pub role: Role,
    pub password: String,
}

/// Authentication service that handles credentials and token issuance
#[derive(Debug, Clone)]
pub struct AuthService {
    pub config: AuthConfig,
    pub db: Arc<DatabaseConnection>,
}

impl AuthService {
    pub fn new(config: AuthConfig, db: Arc<DatabaseConnection>) -> Self {
        Self { config, db }
    }

    /// Hashes a password into an argon2 PHC string
    pub fn hash_password(password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::HashError(e.to_string()))
    }

    pub fn verify_password(password: &str, password_hash: &str) -> bool {
        match PasswordHash::new(password_hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                warn!("Stored password hash is unreadable: {}", e);
                false
            }
        }
    }

    pub async fn find_user(&self, username: &str) -> Result<Option<user::Model>, AuthError> {
        Ok(user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&*self.db)
            .await?)
    }

    /// Creates the user unless one with the same username already exists.
    /// Returns the stored user and whether it was created.
    #[instrument(skip(self, new_user), fields(username = %new_user.username, role = %new_user.role))]
    pub async fn ensure_user(&self, new_user: NewUser) -> Result<(user::Model, bool), AuthError> {
        if let Some(existing) = self.find_user(&new_user.username).await? {
            info!("User already exists, leaving it untouched");
            return Ok((existing, false));
        }

        if new_user.password.is_empty() {
            return Err(AuthError::InvalidInput(format!(
                "password for '{}' must not be empty",
                new_user.username
            )));
        }

        let now = Utc::now();
        let created = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(new_user.username),
            display_name: Set(new_user.display_name),
            email: Set(new_user.email),
            password_hash: Set(Self::hash_password(&new_user.password)?),
            role: Set(new_user.role),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db)
        .await?;

        info!(user_id = %created.id, "User created");
        Ok((created, true))
    }

    /// Verifies credentials and issues an access token
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<TokenPair, AuthError> {
        let user = self
            .find_user(&credentials.username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !Self::verify_password(&credentials.password, &user.password_hash) {
            warn!("Rejected login with a wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        if !user.active {
            warn!("Rejected login for an inactive user");
            return Err(AuthError::InvalidCredentials);
        }

        self.generate_token(&user)
    }

    /// Generate a JWT token for a user
    pub fn generate_token(&self, user: &user::Model) -> Result<TokenPair, AuthError> {
        let now = Utc::now();
        let access_exp = now
            + ChronoDuration::from_std(self.config.access_token_expiration)
                .map_err(|_| AuthError::InternalError("Invalid token duration".to_string()))?;

        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            name: user.display_name.clone(),
            role: user.role.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: access_exp.timestamp(),
            nbf: now.timestamp(),
            iss: self.config.jwt_issuer.clone(),
            aud: self.config.jwt_audience.clone(),
        };

        let access_token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenCreation(e.to_string()))?;

        Ok(TokenPair {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.config.access_token_expiration.as_secs() as i64,
        })
    }

    /// Validate a JWT token and extract the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.config.jwt_issuer.as_str()]);
        validation.set_audience(&[self.config.jwt_audience.as_str()]);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })
    }

    /// Turns a bearer token into the request's authenticated user
    pub fn authenticate(&self, token: &str) -> Result<AuthUser, AuthError> {
        let claims = self.validate_token(token)?;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;
        let role = Role::from_str(&claims.role).map_err(|_| AuthError::InvalidToken)?;

        Ok(AuthUser {
            user_id,
            username: claims.username,
            display_name: claims.name,
            role,
            token_id: claims.jti,
        })
    }
}

/// Token response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenPair {
    pub access_token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Lifetime of the access token in seconds
    pub expires_in: i64,
}

/// Login credentials
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginCredentials {
    #[schema(example = "maintenance")]
    pub username: String,
    pub password: String,
}

/// Authentication error types
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authentication required")]
    MissingAuth,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid authentication token")]
    InvalidToken,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Token creation failed: {0}")]
    TokenCreation(String),

    #[error("Insufficient permissions: {0}")]
    InsufficientPermissions(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Password hashing failed: {0}")]
    HashError(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<AuthError> for ServiceError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingAuth
            | AuthError::InvalidCredentials
            | AuthError::InvalidToken
            | AuthError::TokenExpired => ServiceError::Unauthorized(err.to_string()),
            AuthError::InsufficientPermissions(msg) => ServiceError::Forbidden(msg),
            AuthError::InvalidInput(msg) => ServiceError::ValidationError(msg),
            AuthError::HashError(msg) => ServiceError::HashError(msg),
            AuthError::DatabaseError(e) => ServiceError::DatabaseError(e),
            AuthError::TokenCreation(msg) | AuthError::InternalError(msg) => {
                ServiceError::InternalError(msg)
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ServiceError::from(self).into_response()
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Authentication middleware that extracts and validates the bearer token
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let auth_service = match request.extensions().get::<Arc<AuthService>>() {
        Some(service) => service.clone(),
        None => {
            return AuthError::InternalError("Authentication service not available".into())
                .into_response();
        }
    };

    let user = match bearer_token(request.headers()) {
        Some(token) => auth_service.authenticate(token),
        None => Err(AuthError::MissingAuth),
    };

    match user {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

/// Rejects the request unless the authenticated user's role allows the action
pub async fn permission_middleware(
    State(action): State<Action>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or(AuthError::MissingAuth)?;

    if !user.can(action) {
        warn!(user = %user.username, role = %user.role, action = %action, "Permission denied");
        return Err(AuthError::InsufficientPermissions(format!(
            "role '{}' may not {} maintenance requests",
            user.role, action
        )));
    }

    Ok(next.run(request).await)
}

/// Authentication routes
pub fn auth_routes() -> Router<Arc<AuthService>> {
    let protected = Router::new().route("/me", get(me_handler)).with_auth();

    Router::new()
        .route("/login", post(login_handler))
        .merge(protected)
        .layer(DefaultBodyLimit::max(1024 * 16))
}

/// Exchange a username and password for an access token
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginCredentials,
    responses(
        (status = 200, description = "Access token issued", body = TokenPair),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(auth_service): State<Arc<AuthService>>,
    JsonBody(credentials): JsonBody<LoginCredentials>,
) -> Result<Json<TokenPair>, AuthError> {
    let token_pair = auth_service.login(&credentials).await?;
    Ok(Json(token_pair))
}

/// Identity behind the presented token
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Current user", body = AuthUser),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn me_handler(Extension(user): Extension<AuthUser>) -> Json<AuthUser> {
    Json(user)
}

/// Extension methods for Router to add auth middleware
pub trait AuthRouterExt {
    fn with_auth(self) -> Self;
    fn with_permission(self, action: Action) -> Self;
}

impl<S> AuthRouterExt for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_auth(self) -> Self {
        self.layer(axum::middleware::from_fn(auth_middleware))
    }

    fn with_permission(self, action: Action) -> Self {
        self.layer(axum::middleware::from_fn_with_state(
            action,
            permission_middleware,
        ))
        .with_auth()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn service(secret: &str) -> AuthService {
        let config = AuthConfig::new(
            secret.to_string(),
            "maintenance-clients".into(),
            "maintenance-api".into(),
            Duration::from_secs(600),
        );
        AuthService::new(config, Arc::new(DatabaseConnection::Disconnected))
    }

    fn sample_user(role: Role) -> user::Model {
        let now = Utc::now();
        user::Model {
            id: Uuid::new_v4(),
            username: "tech1".into(),
            display_name: "Tech One".into(),
            email: None,
            password_hash: String::new(),
            role,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn issued_token_authenticates_with_role() {
        let svc = service("first-signing-secret");
        let user = sample_user(Role::Maintenance);
        let token = svc.generate_token(&user).unwrap();

        let auth_user = svc.authenticate(&token.access_token).unwrap();
        assert_eq!(auth_user.user_id, user.id);
        assert_eq!(auth_user.role, Role::Maintenance);
        assert_eq!(auth_user.username, "tech1");
        assert_eq!(token.token_type, "Bearer");
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = service("first-signing-secret")
            .generate_token(&sample_user(Role::Admin))
            .unwrap();
        let result = service("second-signing-secret").authenticate(&token.access_token);
        assert_matches!(result, Err(AuthError::InvalidToken));
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert_matches!(
            service("first-signing-secret").authenticate("not-a-jwt"),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn password_hash_verifies_only_the_original() {
        let hash = AuthService::hash_password("s3cret-pass").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(AuthService::verify_password("s3cret-pass", &hash));
        assert!(!AuthService::verify_password("wrong", &hash));
        assert!(!AuthService::verify_password("s3cret-pass", "not-a-phc-string"));
    }

    #[test]
    fn auth_errors_map_to_service_errors() {
        assert_matches!(
            ServiceError::from(AuthError::MissingAuth),
            ServiceError::Unauthorized(_)
        );
        assert_matches!(
            ServiceError::from(AuthError::InsufficientPermissions("no".into())),
            ServiceError::Forbidden(_)
        );
    }

    #[test]
    fn bearer_token_requires_scheme() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_none());
        headers.insert(header::AUTHORIZATION, "Basic abc".parse().unwrap());
        assert!(bearer_token(&headers).is_none());
        headers.insert(header::AUTHORIZATION, "Bearer abc.def".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc.def"));
    }
}
