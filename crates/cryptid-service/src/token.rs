//! Signed, time-bound session tokens.
//!
//! Tokens are HS256 JWTs carrying a subject (`sub`) and an expiry (`exp`,
//! unix seconds). Validation never errors: any defect in a presented
//! token yields `None` and a `debug` log line naming the cause.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// Lifetime of a token when the caller does not choose one.
pub const DEFAULT_TOKEN_TTL: TimeDelta = TimeDelta::minutes(1);

/// Lifetime of a token issued by the login flow.
pub const LOGIN_TOKEN_TTL: TimeDelta = TimeDelta::minutes(5);

/// Length of a generated signing secret, in bytes.
const RANDOM_SECRET_LEN: usize = 32;

/// Claims embedded in every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user name.
    pub sub: String,
    /// Expiry as unix seconds.
    pub exp: i64,
}

/// Signs and validates tokens with one shared secret.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenIssuer {
    /// Create an issuer for the given symmetric secret.
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Create an issuer with a random per-process secret.
    ///
    /// Tokens it signs stop validating once the process exits.
    pub fn random() -> Self {
        let mut secret = [0u8; RANDOM_SECRET_LEN];
        rand::rng().fill(&mut secret);
        Self::new(&secret)
    }

    /// Issue a token for `subject` that expires after `ttl`
    /// (default [`DEFAULT_TOKEN_TTL`]).
    pub fn issue(&self, subject: &str, ttl: Option<TimeDelta>) -> Result<String, ServiceError> {
        let ttl = ttl.unwrap_or(DEFAULT_TOKEN_TTL);
        let exp = Utc::now()
            .checked_add_signed(ttl)
            .unwrap_or_else(Utc::now)
            .timestamp();
        let claims = Claims {
            sub: subject.to_owned(),
            exp,
        };
        Ok(jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding,
        )?)
    }

    /// Verify signature and expiry and return the subject.
    ///
    /// Returns `None` for a malformed token, a signature mismatch, a
    /// missing `sub`, or a missing or past `exp`.
    pub fn validate(&self, token: &str) -> Option<String> {
        match jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation) {
            Ok(data) if data.claims.sub.is_empty() => {
                tracing::debug!("Token is valid, but its subject is empty");
                None
            }
            Ok(data) => {
                tracing::debug!(username = %data.claims.sub, "Token is valid");
                Some(data.claims.sub)
            }
            Err(e) => {
                match e.kind() {
                    ErrorKind::ExpiredSignature => tracing::debug!("Token has expired"),
                    ErrorKind::InvalidSignature => tracing::debug!("Token signature mismatch"),
                    ErrorKind::MissingRequiredClaim(claim) => {
                        tracing::debug!(claim = %claim, "Token is missing a required claim");
                    }
                    _ => tracing::debug!(error = %e, "JWT decoding error"),
                }
                None
            }
        }
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    const SECRET: &[u8] = b"test-secret";

    #[test]
    fn fresh_token_validates() {
        let issuer = TokenIssuer::new(SECRET);
        let token = issuer.issue("alice", None).unwrap();
        assert_eq!(issuer.validate(&token).as_deref(), Some("alice"));
    }

    #[test]
    fn default_ttl_is_one_minute() {
        let issuer = TokenIssuer::new(SECRET);
        let before = Utc::now().timestamp();
        let token = issuer.issue("alice", None).unwrap();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        let claims = jsonwebtoken::decode::<Claims>(&token, &DecodingKey::from_secret(&[]), &validation)
            .unwrap()
            .claims;

        let lifetime = claims.exp.checked_sub(before).unwrap();
        assert!((60..=61).contains(&lifetime), "lifetime was {lifetime}s");
    }

    #[test]
    fn expired_token_fails() {
        let issuer = TokenIssuer::new(SECRET);
        let token = issuer.issue("alice", Some(TimeDelta::seconds(-30))).unwrap();
        assert!(issuer.validate(&token).is_none());
    }

    #[test]
    fn foreign_signature_fails() {
        let token = TokenIssuer::new(b"other-secret").issue("alice", None).unwrap();
        assert!(TokenIssuer::new(SECRET).validate(&token).is_none());
    }

    #[test]
    fn random_issuers_do_not_share_secrets() {
        let token = TokenIssuer::random().issue("alice", None).unwrap();
        assert!(TokenIssuer::random().validate(&token).is_none());
    }

    #[test]
    fn garbage_fails() {
        let issuer = TokenIssuer::new(SECRET);
        assert!(issuer.validate("").is_none());
        assert!(issuer.validate("not.a.jwt").is_none());
    }

    #[test]
    fn missing_subject_fails() {
        #[derive(Serialize)]
        struct NoSub {
            exp: i64,
        }
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &NoSub {
                exp: Utc::now().timestamp().checked_add(60).unwrap(),
            },
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        assert!(TokenIssuer::new(SECRET).validate(&token).is_none());
    }

    #[test]
    fn missing_expiry_fails() {
        #[derive(Serialize)]
        struct NoExp {
            sub: String,
        }
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &NoExp {
                sub: String::from("alice"),
            },
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        assert!(TokenIssuer::new(SECRET).validate(&token).is_none());
    }
}
