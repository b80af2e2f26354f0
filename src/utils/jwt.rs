use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};

use crate::errors::{Error, Result};

/// Session claims as issued by the auth provider.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: Option<String>,
    pub exp: usize,
    pub iat: usize,
}

pub fn encode_jwt(claim: &Claims, secret: &str) -> Result<String> {
    let token = encode(
        &Header::default(),
        claim,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

pub fn decode_jwt(token: &str, secret: &str) -> Result<TokenData<Claims>> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(Error::from_jwt)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn claims(exp_offset: i64) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            sub: "users:abc".to_string(),
            email: Some("athlete@example.com".to_string()),
            exp: (now + exp_offset) as usize,
            iat: now as usize,
        }
    }

    #[test]
    fn decodes_what_it_encodes() {
        let token = encode_jwt(&claims(3600), "secret").expect("encode");
        let data = decode_jwt(&token, "secret").expect("decode");
        assert_eq!(data.claims.sub, "users:abc");
    }

    #[test]
    fn wrong_secret_is_invalid_token() {
        let token = encode_jwt(&claims(3600), "secret").expect("encode");
        assert!(matches!(decode_jwt(&token, "other"), Err(Error::InvalidToken)));
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        // past the default 60s leeway
        let token = encode_jwt(&claims(-600), "secret").expect("encode");
        assert!(matches!(decode_jwt(&token, "secret"), Err(Error::TokenExpired)));
    }
}
