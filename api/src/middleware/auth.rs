//! JWT authentication middleware for protecting API endpoints.
//!
//! Access and refresh tokens are HS256 JWTs issued on login. The middleware
//! reads the `Authorization: Bearer` header, verifies the access token with
//! the [`TokenService`] registered as app data and injects an
//! [`AuthContext`] into the request extensions.

use actix_web::{
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use chrono::Utc;
use futures_util::future::LocalBoxFuture;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::{
    future::{ready, Ready},
    rc::Rc,
    task::{Context, Poll},
};
use uuid::Uuid;

use cr_core::domain::{Account, Principal};
use cr_shared::JwtConfig;

use crate::handlers::ApiError;

/// Which of the two token flavours a JWT is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Claims carried by access and refresh tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account id
    pub sub: String,
    pub email: String,
    pub is_staff: bool,
    pub token_type: TokenKind,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
}

impl Claims {
    /// Account id parsed from `sub`
    pub fn account_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}

/// A freshly signed token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64,
}

/// Signs and verifies access and refresh tokens
///
/// Both flavours share the signing key; the `token_type` claim keeps a
/// refresh token from being accepted as a bearer credential and vice versa.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    access_expiry_seconds: i64,
    refresh_expiry_seconds: i64,
}

impl TokenService {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.validate_exp = true;

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            issuer: config.issuer.clone(),
            access_expiry_seconds: config.access_token_expiry,
            refresh_expiry_seconds: config.refresh_token_expiry,
        }
    }

    /// Sign an access token for `account`
    pub fn issue(&self, account: &Account) -> Result<IssuedToken, ApiError> {
        self.sign(account, TokenKind::Access, self.access_expiry_seconds)
    }

    /// Sign a refresh token for `account`
    pub fn issue_refresh(&self, account: &Account) -> Result<IssuedToken, ApiError> {
        self.sign(account, TokenKind::Refresh, self.refresh_expiry_seconds)
    }

    /// Verify an access token: signature, issuer, expiry and kind
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        self.decode_kind(token, TokenKind::Access)
    }

    /// Verify a refresh token: signature, issuer, expiry and kind
    pub fn verify_refresh(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        self.decode_kind(token, TokenKind::Refresh)
    }

    fn sign(&self, account: &Account, kind: TokenKind, ttl: i64) -> Result<IssuedToken, ApiError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: account.id.to_string(),
            email: account.identity.clone(),
            is_staff: account.is_staff,
            token_type: kind,
            exp: now + ttl,
            iat: now,
            iss: self.issuer.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ApiError::Domain(cr_core::DomainError::internal(format!("JWT encoding failed: {}", e))))?;

        Ok(IssuedToken {
            token,
            expires_in: ttl,
        })
    }

    fn decode_kind(&self, token: &str, kind: TokenKind) -> Result<Claims, jsonwebtoken::errors::Error> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)?.claims;
        if claims.token_type != kind {
            return Err(ErrorKind::InvalidToken.into());
        }
        Ok(claims)
    }
}

/// Authenticated caller injected into requests
#[derive(Debug, Clone)]
pub struct AuthContext(pub Principal);

impl AuthContext {
    pub fn from_claims(claims: Claims) -> Result<Self, uuid::Error> {
        let account_id = claims.account_id()?;
        Ok(Self(Principal::new(account_id, claims.email, claims.is_staff)))
    }

    pub fn principal(&self) -> &Principal {
        &self.0
    }
}

/// JWT authentication middleware factory
#[derive(Debug, Clone, Copy, Default)]
pub struct JwtAuth;

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let token = match extract_bearer_token(&req) {
                Some(token) => token,
                None => {
                    return Err(ApiError::unauthorized("Missing or invalid Authorization header").into());
                }
            };

            let tokens = match req.app_data::<web::Data<TokenService>>() {
                Some(tokens) => tokens.clone(),
                None => {
                    tracing::error!("TokenService is not registered as app data");
                    return Err(ApiError::unauthorized("Authentication is not configured").into());
                }
            };

            let context = match tokens.verify(&token) {
                Ok(claims) => AuthContext::from_claims(claims)
                    .map_err(|_| ApiError::unauthorized("Invalid token subject"))?,
                Err(e) => {
                    tracing::debug!(error = %e, "Token verification failed");
                    return Err(ApiError::unauthorized("Invalid or expired token").into());
                }
            };

            req.extensions_mut().insert(context);
            service.call(req).await
        })
    }
}

/// Extracts Bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Authentication required").into());

        ready(result)
    }
}
