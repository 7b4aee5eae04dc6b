// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer extraction and HS256 token verification.
//!
//! ## Security
//!
//! - Only HS256 is accepted; any other `alg` in the token header is rejected
//! - `exp` is optional, but when present it must be in the future; a token
//!   whose `exp` equals the current second has already expired
//! - `nbf` is honoured when present
//! - The secret is injected at construction and never re-read from the
//!   environment while serving requests

use std::fmt;

use chrono::Utc;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::Value;

use super::claims::{Identity, TokenClaims};
use super::error::AuthError;

/// Authorization scheme prefix, case-sensitive, single space.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Default clock skew tolerance: none.
pub const DEFAULT_LEEWAY_SECS: u64 = 0;

/// Pull the raw token out of an `Authorization` header value.
///
/// Everything after the prefix is returned as-is, so `"Bearer "` yields an
/// empty token, which then fails verification.
pub fn extract_bearer(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header
        .filter(|h| !h.is_empty())
        .ok_or(AuthError::MissingHeader)?;

    header
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthError::MalformedHeader)
}

/// HMAC signing secret shared with the identity provider.
#[derive(Clone)]
pub struct SigningSecret(String);

impl SigningSecret {
    /// Wrap a secret. Empty strings are treated as "not configured".
    pub fn new(secret: impl Into<String>) -> Option<Self> {
        let secret = secret.into();
        (!secret.is_empty()).then_some(Self(secret))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(<redacted>)")
    }
}

/// Turns a raw token into an [`Identity`].
///
/// Implementations must be safe to call from any number of requests at once
/// and must not block.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<Identity, AuthError>;

    /// Whether a signing secret is available at all.
    fn is_configured(&self) -> bool;
}

/// HS256 JWT verifier backed by a process-wide secret.
#[derive(Clone)]
pub struct JwtVerifier {
    key: Option<DecodingKey>,
    validation: Validation,
}

impl JwtVerifier {
    /// Create a verifier. `None` yields a verifier that rejects every token
    /// with [`AuthError::MisconfiguredSecret`].
    pub fn new(secret: Option<SigningSecret>) -> Self {
        // `exp` is checked by `check_expiry` after decoding.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_nbf = true;
        validation.leeway = DEFAULT_LEEWAY_SECS;

        Self {
            key: secret.map(|s| DecodingKey::from_secret(s.as_bytes())),
            validation,
        }
    }

    /// Set the clock skew tolerance applied to `exp` and `nbf`.
    pub fn with_leeway(mut self, leeway_secs: u64) -> Self {
        self.validation.leeway = leeway_secs;
        self
    }
}

impl CredentialVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let key = self.key.as_ref().ok_or(AuthError::MisconfiguredSecret)?;

        let token_data = decode::<TokenClaims>(token, key, &self.validation)
            .map_err(|_| AuthError::Invalid)?;

        check_expiry(
            token_data.claims.exp.as_ref(),
            Utc::now().timestamp(),
            self.validation.leeway,
        )?;

        Ok(Identity::from_claims(token_data.claims))
    }

    fn is_configured(&self) -> bool {
        self.key.is_some()
    }
}

/// Reject a token whose `exp` is at or before `now - leeway`.
///
/// Numbers are truncated to whole seconds and integer strings are accepted.
/// Anything else, `null` included, is a malformed claim.
fn check_expiry(exp: Option<&Value>, now: i64, leeway: u64) -> Result<(), AuthError> {
    let Some(exp) = exp else {
        return Ok(());
    };

    let exp = match exp {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .ok_or(AuthError::Invalid)?,
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| AuthError::Invalid)?,
        _ => return Err(AuthError::Invalid),
    };

    let leeway = i64::try_from(leeway).unwrap_or(i64::MAX);
    if exp <= now.saturating_sub(leeway) {
        return Err(AuthError::Expired);
    }
    Ok(())
}

impl fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtVerifier")
            .field("configured", &self.key.is_some())
            .field("leeway", &self.validation.leeway)
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::{json, Value};

    pub(crate) const TEST_SECRET: &str = "test-secret";

    pub(crate) fn now() -> i64 {
        chrono::Utc::now().timestamp()
    }

    /// Sign `claims` with HS256 and the given secret.
    pub(crate) fn sign(claims: &Value, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    pub(crate) fn standard_claims() -> Value {
        json!({
            "id": 123,
            "username": "u",
            "email": "e@x.com",
            "tier": "premium",
            "exp": now() + 3600
        })
    }

    fn verifier() -> JwtVerifier {
        JwtVerifier::new(SigningSecret::new(TEST_SECRET))
    }

    #[test]
    fn extract_rejects_missing_and_empty_headers() {
        assert_eq!(extract_bearer(None), Err(AuthError::MissingHeader));
        assert_eq!(extract_bearer(Some("")), Err(AuthError::MissingHeader));
    }

    #[test]
    fn extract_requires_exact_bearer_prefix() {
        let headers = [
            "Basic abc",
            "bearer abc",
            "Bearer",
            "BEARER abc",
            "Bearer\tabc",
            " Bearer abc",
        ];
        for header in headers {
            assert_eq!(
                extract_bearer(Some(header)),
                Err(AuthError::MalformedHeader),
                "{header:?}"
            );
        }
    }

    #[test]
    fn extract_returns_remainder_untrimmed() {
        assert_eq!(extract_bearer(Some("Bearer abc")), Ok("abc"));
        assert_eq!(extract_bearer(Some("Bearer  abc ")), Ok(" abc "));
        assert_eq!(extract_bearer(Some("Bearer ")), Ok(""));
    }

    #[test]
    fn empty_secret_is_not_configured() {
        assert!(SigningSecret::new("").is_none());
        assert!(!JwtVerifier::new(SigningSecret::new("")).is_configured());
        assert!(verifier().is_configured());
    }

    #[test]
    fn debug_output_hides_secret() {
        let secret = SigningSecret::new("super-secret").unwrap();
        assert!(!format!("{secret:?}").contains("super-secret"));
        assert!(!format!("{:?}", JwtVerifier::new(Some(secret))).contains("super-secret"));
    }

    #[test]
    fn valid_token_round_trips_to_identity() {
        let token = sign(&standard_claims(), TEST_SECRET);
        let identity = verifier().verify(&token).unwrap();
        assert_eq!(identity.subject_id.as_deref(), Some("123"));
        assert_eq!(identity.display_name.as_deref(), Some("u"));
        assert_eq!(identity.email.as_deref(), Some("e@x.com"));
        assert_eq!(identity.tier.as_deref(), Some("premium"));
    }

    #[test]
    fn token_without_exp_is_accepted() {
        let token = sign(&json!({ "id": 123, "username": "u" }), TEST_SECRET);
        assert!(verifier().verify(&token).is_ok());
    }

    #[test]
    fn token_without_id_still_verifies() {
        let token = sign(&json!({ "username": "anon" }), TEST_SECRET);
        let identity = verifier().verify(&token).unwrap();
        assert_eq!(identity.subject_id, None);
        assert_eq!(identity.display_name.as_deref(), Some("anon"));
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let token = sign(&standard_claims(), "other-secret");
        assert_eq!(verifier().verify(&token), Err(AuthError::Invalid));
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let mut claims = standard_claims();
        claims["exp"] = json!(now() - 3600);
        let token = sign(&claims, TEST_SECRET);
        assert_eq!(verifier().verify(&token), Err(AuthError::Expired));
    }

    #[test]
    fn negative_exp_is_expired() {
        let token = sign(&json!({ "id": 1, "exp": -100 }), TEST_SECRET);
        assert_eq!(verifier().verify(&token), Err(AuthError::Expired));
    }

    #[test]
    fn exp_equal_to_now_is_expired() {
        let token = sign(&json!({ "id": 1, "exp": now() }), TEST_SECRET);
        assert_eq!(verifier().verify(&token), Err(AuthError::Expired));
    }

    #[test]
    fn zero_and_fractional_past_exp_are_expired() {
        for exp in [json!(0), json!(now() as f64 - 10.5)] {
            let token = sign(&json!({ "id": 1, "exp": exp }), TEST_SECRET);
            assert_eq!(verifier().verify(&token), Err(AuthError::Expired), "{exp}");
        }
    }

    #[test]
    fn non_numeric_exp_is_invalid() {
        for exp in [json!("soon"), json!(null), json!(true), json!([1])] {
            let token = sign(&json!({ "id": 1, "exp": exp }), TEST_SECRET);
            assert_eq!(verifier().verify(&token), Err(AuthError::Invalid), "{exp}");
        }
    }

    #[test]
    fn expiry_boundary_follows_leeway() {
        let now = 1_700_000_000;
        assert_eq!(check_expiry(None, now, 0), Ok(()));
        assert_eq!(check_expiry(Some(&json!(now + 1)), now, 0), Ok(()));
        assert_eq!(check_expiry(Some(&json!(now)), now, 0), Err(AuthError::Expired));
        assert_eq!(check_expiry(Some(&json!(now - 30)), now, 60), Ok(()));
        assert_eq!(
            check_expiry(Some(&json!(now - 60)), now, 60),
            Err(AuthError::Expired)
        );
        assert_eq!(
            check_expiry(Some(&json!(now.to_string())), now, 0),
            Err(AuthError::Expired)
        );
        assert_eq!(check_expiry(Some(&json!(u64::MAX)), now, 0), Ok(()));
    }

    #[test]
    fn leeway_tolerates_recent_expiry() {
        let mut claims = standard_claims();
        claims["exp"] = json!(now() - 30);
        let token = sign(&claims, TEST_SECRET);
        assert!(verifier().with_leeway(120).verify(&token).is_ok());
    }

    #[test]
    fn not_yet_valid_token_is_invalid() {
        let mut claims = standard_claims();
        claims["nbf"] = json!(now() + 3600);
        let token = sign(&claims, TEST_SECRET);
        assert_eq!(verifier().verify(&token), Err(AuthError::Invalid));
    }

    #[test]
    fn other_algorithms_are_invalid() {
        let token = encode(
            &Header::new(Algorithm::HS512),
            &standard_claims(),
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap();
        assert_eq!(verifier().verify(&token), Err(AuthError::Invalid));
    }

    #[test]
    fn unsigned_token_is_invalid() {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(standard_claims().to_string());
        let token = format!("{header}.{payload}.");
        assert_eq!(verifier().verify(&token), Err(AuthError::Invalid));
    }

    #[test]
    fn garbage_and_empty_tokens_are_invalid() {
        for token in ["", "not-a-jwt", "a.b.c", "Bearer x"] {
            assert_eq!(verifier().verify(token), Err(AuthError::Invalid), "{token:?}");
        }
    }

    #[test]
    fn missing_secret_is_reported_before_decoding() {
        let token = sign(&standard_claims(), TEST_SECRET);
        assert_eq!(
            JwtVerifier::new(None).verify(&token),
            Err(AuthError::MisconfiguredSecret)
        );
        assert_eq!(
            JwtVerifier::new(None).verify("garbage"),
            Err(AuthError::MisconfiguredSecret)
        );
    }

    #[test]
    fn verifier_is_shareable_across_threads() {
        let verifier = std::sync::Arc::new(verifier());
        let token = sign(&standard_claims(), TEST_SECRET);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let verifier = verifier.clone();
                let token = token.clone();
                std::thread::spawn(move || verifier.verify(&token))
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap().is_ok());
        }
    }
}
