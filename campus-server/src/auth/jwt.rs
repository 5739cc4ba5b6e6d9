//! JWT 认证模块 / JWT issuing and validation
//!
//! HS256 tokens with issuer, audience, and expiry all enforced on
//! validation. Staff and student tokens share the claim shape but carry
//! a `token_type` discriminator; middleware never lets one act as the
//! other.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};
use shared::policy::{Actor, Role};

pub const TOKEN_TYPE_STAFF: &str = "staff";
pub const TOKEN_TYPE_STUDENT: &str = "student";

const DEFAULT_EXPIRATION_MINUTES: i64 = 480;
const DEFAULT_ISSUER: &str = "campus-server";
const DEFAULT_AUDIENCE: &str = "campus-clients";

/// Generate a random 64-byte secret, base64-encoded. Dev only; falls
/// back to a fixed key if the system RNG is unavailable.
fn generate_secure_jwt_secret() -> String {
    use base64::Engine;
    let rng = SystemRandom::new();
    let mut bytes = [0u8; 64];
    if rng.fill(&mut bytes).is_err() {
        tracing::error!("system RNG unavailable, using fixed development secret");
        return "campus-server-development-secret-must-be-replaced".to_string();
    }
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

fn load_jwt_secret() -> String {
    match std::env::var("JWT_SECRET") {
        Ok(secret) if !secret.trim().is_empty() => secret,
        _ => {
            #[cfg(debug_assertions)]
            {
                tracing::warn!("JWT_SECRET not set, using a generated secret (dev only)");
                generate_secure_jwt_secret()
            }
            #[cfg(not(debug_assertions))]
            {
                panic!("JWT_SECRET environment variable must be set in production")
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_minutes: i64,
    pub issuer: String,
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: load_jwt_secret(),
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_EXPIRATION_MINUTES),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| DEFAULT_ISSUER.to_string()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| DEFAULT_AUDIENCE.to_string()),
        }
    }
}

/// Token claims. `permissions` is comma-joined to keep the token small.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub role: String,
    pub branch_id: Option<i64>,
    pub permissions: String,
    pub token_type: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub aud: String,
}

pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: JwtConfig,
}

impl JwtService {
    pub fn new() -> Self {
        Self::with_config(JwtConfig::default())
    }

    pub fn with_config(config: JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            config,
        }
    }

    fn base_claims(&self, sub: String, username: &str, token_type: &str) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            sub,
            username: username.to_string(),
            role: String::new(),
            branch_id: None,
            permissions: String::new(),
            token_type: token_type.to_string(),
            exp: now + self.config.expiration_minutes * 60,
            iat: now,
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        }
    }

    /// Issue a staff token carrying role, branch, and permission set.
    pub fn generate_staff_token(
        &self,
        id: i64,
        username: &str,
        role: Role,
        branch_id: Option<i64>,
        permissions: &[&str],
    ) -> AppResult<String> {
        let mut claims = self.base_claims(id.to_string(), username, TOKEN_TYPE_STAFF);
        claims.role = role.to_string();
        claims.branch_id = branch_id;
        claims.permissions = permissions.join(",");
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("token generation failed: {e}")))
    }

    /// Issue a student portal token. Always branch-bound.
    pub fn generate_student_token(
        &self,
        id: i64,
        username: &str,
        branch_id: i64,
    ) -> AppResult<String> {
        let mut claims = self.base_claims(id.to_string(), username, TOKEN_TYPE_STUDENT);
        claims.role = Role::Student.to_string();
        claims.branch_id = Some(branch_id);
        claims.permissions = shared::policy::permissions_for(Role::Student).join(",");
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("token generation failed: {e}")))
    }

    /// Verify signature, expiry, issuer, and audience.
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::token_expired(),
                _ => AppError::invalid_token(),
            })
    }

    /// Pull the raw token out of an `Authorization: Bearer ...` header.
    pub fn extract_from_header(header: Option<&str>) -> AppResult<&str> {
        header
            .and_then(|h| h.strip_prefix("Bearer "))
            .filter(|t| !t.is_empty())
            .ok_or_else(AppError::unauthorized)
    }

    pub fn expiration_seconds(&self) -> i64 {
        self.config.expiration_minutes * 60
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

/// Staff identity extracted from a validated token, stored in request
/// extensions by the auth middleware.
#[derive(Debug, Clone)]
pub struct CurrentActor {
    pub id: String,
    pub username: String,
    pub role: Role,
    pub branch_id: Option<i64>,
    pub permissions: Vec<String>,
}

impl CurrentActor {
    /// Exact match or the admin `"*"` sentinel; no prefix matching.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == "*" || p == permission)
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn actor(&self) -> Actor {
        Actor::new(self.id.clone(), self.role, self.branch_id)
    }

    /// Branch scope for queries: `None` only for admins.
    pub fn scope(&self) -> Option<i64> {
        self.actor().scope()
    }
}

impl TryFrom<Claims> for CurrentActor {
    type Error = AppError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        if claims.token_type != TOKEN_TYPE_STAFF {
            return Err(AppError::invalid_token());
        }
        let role: Role = claims.role.parse().map_err(|_| AppError::invalid_token())?;
        if role == Role::Student {
            return Err(AppError::invalid_token());
        }
        let actor = CurrentActor {
            id: claims.sub,
            username: claims.username,
            role,
            branch_id: claims.branch_id,
            permissions: claims
                .permissions
                .split(',')
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        };
        // A scoped role without a branch would bypass data scoping.
        actor
            .actor()
            .validate()
            .map_err(|_| AppError::invalid_token())?;
        Ok(actor)
    }
}

/// Student identity for portal routes. Never interchangeable with
/// [`CurrentActor`].
#[derive(Debug, Clone)]
pub struct CurrentStudent {
    pub id: String,
    pub username: String,
    pub branch_id: i64,
}

impl CurrentStudent {
    pub fn student_id(&self) -> AppResult<i64> {
        self.id.parse().map_err(|_| AppError::invalid_token())
    }
}

impl TryFrom<Claims> for CurrentStudent {
    type Error = AppError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        if claims.token_type != TOKEN_TYPE_STUDENT {
            return Err(AppError::invalid_token());
        }
        let branch_id = claims.branch_id.ok_or_else(AppError::invalid_token)?;
        Ok(CurrentStudent {
            id: claims.sub,
            username: claims.username,
            branch_id,
        })
    }
}
