//! Bearer tokens for JWT-protected RPC endpoints.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::error::DevnetError;

/// Validity window of a signed token, in seconds.
pub const JWT_EXPIRATION_SECONDS: u64 = 3600;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    exp: u64,
}

/// Signs a short-lived HS256 token over the shared secret.
///
/// The token carries only an expiry claim, [`JWT_EXPIRATION_SECONDS`] from
/// now, matching what the protected geth endpoints expect.
pub fn sign_token(secret: &str) -> Result<String, DevnetError> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_secs();
    let claims = Claims { exp: now + JWT_EXPIRATION_SECONDS };
    let token =
        jsonwebtoken::encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))?;
    Ok(token)
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{Algorithm, DecodingKey, Validation};

    use super::*;

    #[test]
    fn test_token_round_trips_with_shared_secret() {
        let secret = "0xfad2709d0bb03bf0e8ba3c99bea194575d3e98863133d1af638ed056d1d59345";
        let token = sign_token(secret).unwrap();

        let decoded = jsonwebtoken::decode::<Claims>(
            &token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .unwrap();

        let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs();
        let remaining = decoded.claims.exp.saturating_sub(now);
        assert!(remaining > JWT_EXPIRATION_SECONDS - 60);
        assert!(remaining <= JWT_EXPIRATION_SECONDS);
    }

    #[test]
    fn test_token_rejects_wrong_secret() {
        let token = sign_token("secret-a").unwrap();
        let result = jsonwebtoken::decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"secret-b"),
            &Validation::new(Algorithm::HS256),
        );
        assert!(result.is_err());
    }
}
