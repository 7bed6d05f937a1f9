// CourseDesk
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Business logic for user authentication.

use crate::model::{AccessToken, Role, Session, User, UserId};
use coursedesk_core::clocks::Clock;
use coursedesk_core::db::Db;
use coursedesk_core::driver::{DriverError, DriverResult};
use coursedesk_core::env::{get_optional_var, get_required_var};
use coursedesk_core::model::EmailAddress;
use derivative::Derivative;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;

mod admin;
pub use admin::AdminOptions;
mod login;
mod register;
#[cfg(any(test, feature = "testutils"))]
pub mod testutils;

/// Default value for the `TOKEN_MAX_AGE` setting when not specified.
const DEFAULT_TOKEN_MAX_AGE_SECONDS: u64 = 7 * 24 * 60 * 60;

/// Default value for the `TOKEN_MAX_SKEW` setting when not specified.
const DEFAULT_TOKEN_MAX_SKEW_SECONDS: u64 = 5 * 60;

/// Minimum length of the secret used to sign tokens, in bytes.
const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Configuration options for the authentication driver.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
#[cfg_attr(test, derivative(PartialEq))]
pub struct AuthnOptions {
    /// Secret used to sign and validate access tokens with HS256.
    #[derivative(Debug = "ignore")]
    pub jwt_secret: String,

    /// The amount of time we consider tokens valid for.
    pub token_max_age: Duration,

    /// The amount of time we tolerate in clock skew when validating tokens.  We should never see
    /// this, except if we end up serving requests from different machines and their clocks aren't
    /// properly synchronized.
    pub token_max_skew: Duration,
}

impl AuthnOptions {
    /// Creates a new set of options with the default token lifetimes.
    pub fn new<S: Into<String>>(jwt_secret: S) -> Result<Self, String> {
        let jwt_secret = jwt_secret.into();
        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(format!(
                "JWT secret must be at least {} bytes long",
                MIN_JWT_SECRET_LENGTH
            ));
        }
        Ok(Self {
            jwt_secret,
            token_max_age: Duration::from_secs(DEFAULT_TOKEN_MAX_AGE_SECONDS),
            token_max_skew: Duration::from_secs(DEFAULT_TOKEN_MAX_SKEW_SECONDS),
        })
    }

    /// Creates a new set of options from environment variables whose name is prefixed with the
    /// given `prefix`.
    ///
    /// This will use variables such as `<prefix>_JWT_SECRET`, `<prefix>_TOKEN_MAX_AGE` and
    /// `<prefix>_TOKEN_MAX_SKEW`.
    pub fn from_env(prefix: &str) -> Result<Self, String> {
        let mut opts = Self::new(get_required_var::<String>(prefix, "JWT_SECRET")?)?;
        if let Some(max_age) = get_optional_var::<Duration>(prefix, "TOKEN_MAX_AGE")? {
            opts.token_max_age = max_age;
        }
        if let Some(max_skew) = get_optional_var::<Duration>(prefix, "TOKEN_MAX_SKEW")? {
            opts.token_max_skew = max_skew;
        }
        Ok(opts)
    }
}

/// Claims stored in the access tokens we issue.
#[derive(Debug, Deserialize, Serialize)]
struct Claims {
    /// Identifier of the user that owns the token.
    sub: UserId,

    /// Email of the user at issuance time.
    email: EmailAddress,

    /// Roles of the user at issuance time.
    roles: Vec<Role>,

    /// Issuance time in seconds since the epoch.
    iat: i64,

    /// Expiration time in seconds since the epoch.
    exp: i64,
}

/// Business logic.
///
/// The public operations exposed by the driver are all "one shot": they start and commit a
/// transaction, so it's incorrect for the caller to use two separate calls.  For this reason,
/// these operations consume the driver in an attempt to minimize the possibility of executing
/// two operations.
#[derive(Clone)]
pub struct AuthnDriver {
    /// The database that the driver uses for persistence.
    db: Arc<dyn Db + Send + Sync>,

    /// Clock instance to obtain the current time.
    clock: Arc<dyn Clock + Send + Sync>,

    /// Authentication realm to return to requests.
    realm: &'static str,

    /// Options for the authentication driver.
    opts: AuthnOptions,

    /// Key to sign new tokens with.
    encoding_key: EncodingKey,

    /// Key to validate the signature of incoming tokens with.
    decoding_key: DecodingKey,
}

impl AuthnDriver {
    /// Creates a new driver backed by the given dependencies.
    pub fn new(
        db: Arc<dyn Db + Send + Sync>,
        clock: Arc<dyn Clock + Send + Sync>,
        realm: &'static str,
        opts: AuthnOptions,
    ) -> Self {
        let encoding_key = EncodingKey::from_secret(opts.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(opts.jwt_secret.as_bytes());
        Self { db, clock, realm, opts, encoding_key, decoding_key }
    }

    /// Gets the authentication realm.
    pub fn realm(&self) -> &'static str {
        self.realm
    }

    /// Signs a new access token for `user` issued at `now`.
    fn issue_token(&self, user: &User, now: OffsetDateTime) -> DriverResult<AccessToken> {
        let expires = now + self.opts.token_max_age;
        let claims = Claims {
            sub: user.id(),
            email: user.email().clone(),
            roles: user.roles().to_vec(),
            iat: now.unix_timestamp(),
            exp: expires.unix_timestamp(),
        };
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| DriverError::BackendError(format!("Cannot sign access token: {}", e)))?;
        Ok(AccessToken::new(token)?)
    }

    /// Decodes the session in `token` and validates it.
    ///
    /// This does not hit the database: the roles in the session are those the user had when the
    /// token was issued.
    pub fn get_session(&self, token: &AccessToken) -> DriverResult<Session> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiration is checked below against our own clock.
        validation.validate_exp = false;

        let claims = jsonwebtoken::decode::<Claims>(token.as_str(), &self.decoding_key, &validation)
            .map_err(|e| DriverError::Unauthorized(format!("Invalid access token: {}", e)))?
            .claims;

        let login_time = OffsetDateTime::from_unix_timestamp(claims.iat)
            .map_err(|e| DriverError::Unauthorized(format!("Invalid access token: {}", e)))?;
        let expires = OffsetDateTime::from_unix_timestamp(claims.exp)
            .map_err(|e| DriverError::Unauthorized(format!("Invalid access token: {}", e)))?;

        let now = self.clock.now_utc();
        let expired = expires + self.opts.token_max_skew < now
            || login_time + self.opts.token_max_age + self.opts.token_max_skew < now;
        let skew = login_time > now + self.opts.token_max_skew;
        if expired || skew {
            return Err(DriverError::Unauthorized(
                "Session expired; please log in again".to_owned(),
            ));
        }

        Ok(Session::new(claims.sub, claims.email, claims.roles, login_time))
    }
}

#[cfg(test)]
mod tests {
    use super::testutils::*;
    use super::*;

    /// A secret that satisfies the length requirements.
    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    pub fn test_options_new_secret_too_short() {
        let err = AuthnOptions::new("short").unwrap_err();
        assert!(err.contains("at least 32 bytes"));
    }

    #[test]
    pub fn test_options_from_env_defaults() {
        temp_env::with_vars(
            [
                ("PREFIX_JWT_SECRET", Some(SECRET)),
                ("PREFIX_TOKEN_MAX_AGE", None),
                ("PREFIX_TOKEN_MAX_SKEW", None),
            ],
            || {
                let opts = AuthnOptions::from_env("PREFIX").unwrap();
                assert_eq!(AuthnOptions::new(SECRET).unwrap(), opts);
                assert_eq!(Duration::from_secs(7 * 24 * 3600), opts.token_max_age);
            },
        );
    }

    #[test]
    pub fn test_options_from_env_all_present() {
        temp_env::with_vars(
            [
                ("PREFIX_JWT_SECRET", Some(SECRET)),
                ("PREFIX_TOKEN_MAX_AGE", Some("10m")),
                ("PREFIX_TOKEN_MAX_SKEW", Some("20s")),
            ],
            || {
                let opts = AuthnOptions::from_env("PREFIX").unwrap();
                assert_eq!(
                    AuthnOptions {
                        jwt_secret: SECRET.to_owned(),
                        token_max_age: Duration::from_secs(10 * 60),
                        token_max_skew: Duration::from_secs(20),
                    },
                    opts
                );
            },
        );
    }

    #[test]
    pub fn test_options_from_env_missing_secret() {
        temp_env::with_var_unset("PREFIX_JWT_SECRET", || {
            let err = AuthnOptions::from_env("PREFIX").unwrap_err();
            assert!(err.contains("PREFIX_JWT_SECRET not present"));
        });
    }

    #[test]
    pub fn test_options_debug_hides_secret() {
        let opts = AuthnOptions::new(SECRET).unwrap();
        assert!(!format!("{:?}", opts).contains(SECRET));
    }

    #[tokio::test]
    async fn test_get_session_ok() {
        let context = TestContext::setup().await;

        let token = context.do_test_login("user@example.com", &[Role::User]).await;
        let session = context.driver().get_session(&token).unwrap();
        assert_eq!(&EmailAddress::from("user@example.com"), session.email());
        assert_eq!(&[Role::User], session.roles());
        assert!(!session.has_role(Role::Admin));
    }

    #[tokio::test]
    async fn test_get_session_carries_admin_role() {
        let context = TestContext::setup().await;

        let token = context.do_test_login("admin@example.com", &[Role::Admin, Role::User]).await;
        let session = context.driver().get_session(&token).unwrap();
        assert!(session.has_role(Role::Admin));
    }

    #[tokio::test]
    async fn test_get_session_expired() {
        let context = TestContext::setup().await;
        let max_age = context.driver().opts.token_max_age;
        let max_skew = context.driver().opts.token_max_skew;

        let token = context.do_test_login("user@example.com", &[Role::User]).await;

        context.clock().advance(max_age);
        context.driver().get_session(&token).unwrap();

        context.clock().advance(max_skew);
        context.driver().get_session(&token).unwrap();

        context.clock().advance(Duration::from_secs(1));
        match context.driver().get_session(&token) {
            Err(DriverError::Unauthorized(msg)) => assert!(msg.contains("expired")),
            e => panic!("{:?}", e),
        }
    }

    #[tokio::test]
    async fn test_get_session_issued_in_the_future() {
        let context = TestContext::setup().await;
        let max_skew = context.driver().opts.token_max_skew;

        let now = context.clock().now_utc();
        context.clock().set(now + max_skew + Duration::from_secs(1));
        let token = context.do_test_login("user@example.com", &[Role::User]).await;

        context.clock().set(now + Duration::from_secs(1));
        context.driver().get_session(&token).unwrap();

        context.clock().set(now);
        match context.driver().get_session(&token) {
            Err(DriverError::Unauthorized(msg)) => assert!(msg.contains("expired")),
            e => panic!("{:?}", e),
        }
    }

    #[tokio::test]
    async fn test_get_session_bad_signature() {
        let context = TestContext::setup().await;
        let token = context.do_test_login("user@example.com", &[Role::User]).await;

        let other = AuthnDriver::new(
            context.db(),
            context.clock(),
            "the-realm",
            AuthnOptions::new("a different secret that is long enough").unwrap(),
        );
        match other.get_session(&token) {
            Err(DriverError::Unauthorized(msg)) => assert!(msg.contains("Invalid access token")),
            e => panic!("{:?}", e),
        }
    }

    #[tokio::test]
    async fn test_get_session_garbage() {
        let context = TestContext::setup().await;

        match context.driver().get_session(&AccessToken::new("a.b.c").unwrap()) {
            Err(DriverError::Unauthorized(msg)) => assert!(msg.contains("Invalid access token")),
            e => panic!("{:?}", e),
        }
    }
}
