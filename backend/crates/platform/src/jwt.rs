//! JSON Web Tokens
//!
//! HS256 access/refresh pairs. Each kind is signed with its own secret and
//! carries a `typ` claim, so a refresh token never passes as an access token.

use std::fmt;
use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which half of the pair a token is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Identity embedded in a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    pub id: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: String,
    pub email: String,
    pub role: String,
    pub typ: TokenKind,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn subject(&self) -> TokenSubject {
        TokenSubject {
            id: self.id.clone(),
            email: self.email.clone(),
            role: self.role.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Token expired")]
    Expired,

    #[error("Token invalid")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    #[error("Expected a {expected:?} token")]
    WrongKind { expected: TokenKind },

    #[error("Token encoding failed")]
    Encode(#[source] jsonwebtoken::errors::Error),
}

struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl KeyPair {
    fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }
}

/// Signing keys and lifetimes for both token kinds
pub struct JwtKeys {
    access: KeyPair,
    refresh: KeyPair,
    validation: Validation,
}

impl JwtKeys {
    pub fn new(
        access_secret: &[u8],
        refresh_secret: &[u8],
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat"]);

        Self {
            access: KeyPair::new(access_secret, access_ttl),
            refresh: KeyPair::new(refresh_secret, refresh_ttl),
            validation,
        }
    }

    fn keys(&self, kind: TokenKind) -> &KeyPair {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }

    pub fn ttl(&self, kind: TokenKind) -> Duration {
        self.keys(kind).ttl
    }

    /// Sign a token of `kind` for `subject`, valid from now
    pub fn issue(&self, kind: TokenKind, subject: &TokenSubject) -> Result<String, JwtError> {
        self.issue_at(kind, subject, chrono::Utc::now().timestamp())
    }

    /// Sign a token as if issued at `iat` (unix seconds)
    pub fn issue_at(
        &self,
        kind: TokenKind,
        subject: &TokenSubject,
        iat: i64,
    ) -> Result<String, JwtError> {
        let keys = self.keys(kind);
        let claims = Claims {
            id: subject.id.clone(),
            email: subject.email.clone(),
            role: subject.role.clone(),
            typ: kind,
            iat,
            exp: iat + keys.ttl.as_secs() as i64,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding).map_err(JwtError::Encode)
    }

    pub fn issue_pair(&self, subject: &TokenSubject) -> Result<TokenPair, JwtError> {
        Ok(TokenPair {
            access_token: self.issue(TokenKind::Access, subject)?,
            refresh_token: self.issue(TokenKind::Refresh, subject)?,
        })
    }

    /// Check signature, expiry and `typ`
    pub fn verify(&self, kind: TokenKind, token: &str) -> Result<Claims, JwtError> {
        let data = decode::<Claims>(token, &self.keys(kind).decoding, &self.validation).map_err(
            |e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Invalid(e),
            },
        )?;

        if data.claims.typ != kind {
            return Err(JwtError::WrongKind { expected: kind });
        }
        Ok(data.claims)
    }
}

impl fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtKeys")
            .field("access_ttl", &self.access.ttl)
            .field("refresh_ttl", &self.refresh.ttl)
            .field("secrets", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> JwtKeys {
        JwtKeys::new(
            b"access-secret-for-tests",
            b"refresh-secret-for-tests",
            Duration::from_secs(900),
            Duration::from_secs(604_800),
        )
    }

    fn subject() -> TokenSubject {
        TokenSubject {
            id: "5d2c6a0e-8a41-4b7e-9f59-1f8e8e2b7c11".to_string(),
            email: "sara@example.com".to_string(),
            role: "user".to_string(),
        }
    }

    #[test]
    fn test_issue_and_verify_pair() {
        let keys = keys();
        let pair = keys.issue_pair(&subject()).unwrap();

        let access = keys.verify(TokenKind::Access, &pair.access_token).unwrap();
        assert_eq!(access.subject(), subject());
        assert_eq!(access.typ, TokenKind::Access);
        assert_eq!(access.exp - access.iat, 900);

        let refresh = keys.verify(TokenKind::Refresh, &pair.refresh_token).unwrap();
        assert_eq!(refresh.exp - refresh.iat, 604_800);
    }

    #[test]
    fn test_refresh_token_is_not_an_access_token() {
        let keys = keys();
        let pair = keys.issue_pair(&subject()).unwrap();

        assert!(matches!(
            keys.verify(TokenKind::Access, &pair.refresh_token),
            Err(JwtError::Invalid(_))
        ));
    }

    #[test]
    fn test_typ_checked_even_with_shared_secret() {
        let keys = JwtKeys::new(
            b"same",
            b"same",
            Duration::from_secs(60),
            Duration::from_secs(60),
        );
        let refresh = keys.issue(TokenKind::Refresh, &subject()).unwrap();

        assert!(matches!(
            keys.verify(TokenKind::Access, &refresh),
            Err(JwtError::WrongKind {
                expected: TokenKind::Access
            })
        ));
    }

    #[test]
    fn test_expired_token() {
        let keys = keys();
        let long_ago = chrono::Utc::now().timestamp() - 10_000;
        let token = keys
            .issue_at(TokenKind::Access, &subject(), long_ago)
            .unwrap();

        assert!(matches!(
            keys.verify(TokenKind::Access, &token),
            Err(JwtError::Expired)
        ));
    }

    #[test]
    fn test_tampered_token() {
        let keys = keys();
        let mut token = keys.issue(TokenKind::Access, &subject()).unwrap();
        token.push('x');

        assert!(keys.verify(TokenKind::Access, &token).is_err());
        assert!(keys.verify(TokenKind::Access, "garbage").is_err());
    }
}
