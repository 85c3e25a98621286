use anyhow::{anyhow, Result};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use kbase_common::{Requester, Role};

const TOKEN_DURATION_SECS: i64 = 24 * 3600; // 24 hours

/// JWT Claims stored in the token. `role` is a string on the wire and
/// parsed strictly on the way back in.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub name: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub jti: String,
}

/// JWT service for creating and verifying bearer tokens.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
}

impl JwtService {
    pub fn new(secret: &str, issuer: String) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
        }
    }

    /// Create a token carrying the requester's identity and role.
    pub fn create_token(&self, requester: &Requester) -> Result<String> {
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::seconds(TOKEN_DURATION_SECS);

        let claims = Claims {
            sub: requester.id.to_string(),
            name: requester.name.clone(),
            role: requester.role.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(Into::into)
    }

    /// Verify a token and reconstruct the requester. Rejects expired
    /// tokens, wrong issuers, and unknown roles.
    pub fn verify_token(&self, token: &str) -> Result<Requester> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)?;

        let id = Uuid::parse_str(&claims.sub)
            .map_err(|_| anyhow!("invalid subject in token"))?;
        let role = Role::parse(&claims.role)
            .ok_or_else(|| anyhow!("unknown role '{}' in token", claims.role))?;

        Ok(Requester {
            id,
            name: claims.name,
            role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> JwtService {
        JwtService::new("test-secret-key", "kbase".to_string())
    }

    #[test]
    fn roundtrip_token() {
        let svc = test_service();
        let requester = Requester::new("agent smith", Role::Agent);
        let token = svc.create_token(&requester).unwrap();
        let verified = svc.verify_token(&token).unwrap();
        assert_eq!(verified.id, requester.id);
        assert_eq!(verified.name, "agent smith");
        assert_eq!(verified.role, Role::Agent);
    }

    #[test]
    fn rejects_invalid_token() {
        let svc = test_service();
        assert!(svc.verify_token("garbage").is_err());
    }

    #[test]
    fn rejects_wrong_secret() {
        let svc1 = JwtService::new("secret-a", "kbase".to_string());
        let svc2 = JwtService::new("secret-b", "kbase".to_string());
        let token = svc1.create_token(&Requester::new("x", Role::Admin)).unwrap();
        assert!(svc2.verify_token(&token).is_err());
    }

    #[test]
    fn rejects_wrong_issuer() {
        let svc1 = JwtService::new("secret", "kbase".to_string());
        let svc2 = JwtService::new("secret", "other".to_string());
        let token = svc1.create_token(&Requester::new("x", Role::Admin)).unwrap();
        assert!(svc2.verify_token(&token).is_err());
    }

    #[test]
    fn token_expiry_is_24h() {
        let svc = test_service();
        let token = svc.create_token(&Requester::new("x", Role::Viewer)).unwrap();
        // Decode without role checks to inspect raw claims.
        let mut validation = Validation::default();
        validation.set_issuer(&["kbase"]);
        let claims = decode::<Claims>(
            &token,
            &DecodingKey::from_secret("test-secret-key".as_bytes()),
            &validation,
        )
        .unwrap()
        .claims;
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn viewer_role_survives_roundtrip() {
        let svc = test_service();
        let token = svc.create_token(&Requester::new("reader", Role::Viewer)).unwrap();
        let verified = svc.verify_token(&token).unwrap();
        assert!(!verified.role.is_privileged());
    }
}
