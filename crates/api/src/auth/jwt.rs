//! JWT generation/validation and password-reset token helpers.
//!
//! Tokens are HS256-signed JWTs containing a [`Claims`] payload. Password
//! reset tokens are opaque random strings; only their SHA-256 hash is stored
//! on the user record so a leaked data file does not expose live tokens.

use action_bank_core::types::EntityId;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use uuid::Uuid;

/// JWT claims embedded in every token.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub username: String,
    pub user_id: EntityId,
    /// The user's role name (e.g. `"admin"`).
    pub user_type: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
}

/// Configuration for JWT generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Token lifetime in hours (default: 12).
    pub expiry_hours: i64,
}

/// Default token expiry in hours.
pub const DEFAULT_EXPIRY_HOURS: i64 = 12;

/// Generate an HS256 token for the given user.
pub fn generate_token(
    user_id: &str,
    username: &str,
    user_type: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let exp = now + config.expiry_hours * 3600;

    let claims = Claims {
        username: username.to_string(),
        user_id: user_id.to_string(),
        user_type: user_type.to_string(),
        exp,
        iat: now,
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode a token, returning the embedded [`Claims`].
///
/// Validates the signature and expiration.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

/// Generate a random password-reset token.
///
/// Returns `(plaintext_token, sha256_hex_hash)`. The plaintext goes to the
/// caller; only the hash is persisted.
pub fn generate_reset_token() -> (String, String) {
    let plaintext = Uuid::new_v4().to_string();
    let hash = hash_reset_token(&plaintext);
    (plaintext, hash)
}

/// SHA-256 hex digest of a reset token.
pub fn hash_reset_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Whether `token` hashes to `stored_hash`, compared in constant time.
pub fn reset_token_matches(token: &str, stored_hash: &str) -> bool {
    let candidate = hash_reset_token(token);
    bool::from(candidate.as_bytes().ct_eq(stored_hash.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            expiry_hours: DEFAULT_EXPIRY_HOURS,
        }
    }

    #[test]
    fn test_generate_and_validate_token() {
        let config = test_config();
        let token = generate_token("u-42", "alice", "admin", &config)
            .expect("token generation should succeed");

        let claims = validate_token(&token, &config).expect("token validation should succeed");
        assert_eq!(claims.user_id, "u-42");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.user_type, "admin");
        assert_eq!(claims.exp - claims.iat, 12 * 3600);
    }

    #[test]
    fn test_claims_use_camel_case() {
        let claims = Claims {
            username: "alice".into(),
            user_id: "u1".into(),
            user_type: "basic".into(),
            exp: 2,
            iat: 1,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["userType"], "basic");
    }

    #[test]
    fn test_expired_token_fails() {
        let config = test_config();

        // Well beyond the default 60-second leeway.
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            username: "alice".into(),
            user_id: "u1".into(),
            user_type: "basic".into(),
            exp: now - 300,
            iat: now - 600,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .expect("encoding should succeed");

        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn test_different_secrets_fail() {
        let config_a = JwtConfig {
            secret: "secret-alpha".to_string(),
            expiry_hours: 1,
        };
        let config_b = JwtConfig {
            secret: "secret-bravo".to_string(),
            expiry_hours: 1,
        };

        let token = generate_token("u1", "alice", "basic", &config_a)
            .expect("token generation should succeed");

        assert!(
            validate_token(&token, &config_b).is_err(),
            "token signed with a different secret must fail"
        );
    }

    #[test]
    fn test_reset_token_hash_matches() {
        let (plaintext, hash) = generate_reset_token();
        assert_eq!(hash, hash_reset_token(&plaintext));
        assert_eq!(hash.len(), 64);
        assert_ne!(hash, plaintext);
    }

    #[test]
    fn test_reset_token_matches_only_its_own_hash() {
        let (plaintext, hash) = generate_reset_token();
        assert!(reset_token_matches(&plaintext, &hash));
        assert!(!reset_token_matches("guess", &hash));
        assert!(!reset_token_matches(&plaintext, ""));
    }
}
