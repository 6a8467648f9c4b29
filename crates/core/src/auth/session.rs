//! Signed session tokens.
//!
//! A token is `base64url(claims_json) . base64url(hmac_sha256(claims_json))`,
//! signed with the process-wide session secret. Claims carry the account
//! email and issue/expiry timestamps. Expiry slides: every successful
//! verification is followed by re-issuing a token with a fresh window, which
//! callers return to the client.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::error::{CareLinkError, CareLinkResult};

type HmacSha256 = Hmac<Sha256>;

/// Claims carried by a session token.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

fn mac(secret: &[u8]) -> CareLinkResult<HmacSha256> {
    HmacSha256::new_from_slice(secret)
        .map_err(|_| CareLinkError::Validation("invalid session secret".into()))
}

/// Issue a token for `email` valid for `ttl_secs` from now.
pub fn issue(secret: &[u8], email: &str, ttl_secs: i64) -> CareLinkResult<String> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        email: email.to_string(),
        iat: now,
        exp: now + ttl_secs,
    };

    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?);
    let mut mac = mac(secret)?;
    mac.update(payload.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Ok(format!("{payload}.{signature}"))
}

/// Verify a token's signature and expiry, returning its claims.
///
/// Every failure mode — malformed, forged, expired — reports as
/// [`CareLinkError::Unauthorized`].
pub fn verify(secret: &[u8], token: &str) -> CareLinkResult<Claims> {
    let (payload, signature) = token
        .split_once('.')
        .ok_or(CareLinkError::Unauthorized)?;

    let signature = URL_SAFE_NO_PAD
        .decode(signature)
        .map_err(|_| CareLinkError::Unauthorized)?;

    let mut mac = mac(secret)?;
    mac.update(payload.as_bytes());
    mac.verify_slice(&signature)
        .map_err(|_| CareLinkError::Unauthorized)?;

    let claims_json = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| CareLinkError::Unauthorized)?;
    let claims: Claims =
        serde_json::from_slice(&claims_json).map_err(|_| CareLinkError::Unauthorized)?;

    if claims.exp <= Utc::now().timestamp() {
        return Err(CareLinkError::Unauthorized);
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    #[test]
    fn round_trips_claims() {
        let token = issue(SECRET, "doc@example.org", 3600).unwrap();
        let claims = verify(SECRET, &token).unwrap();
        assert_eq!(claims.email, "doc@example.org");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn rejects_wrong_secret() {
        let token = issue(SECRET, "doc@example.org", 3600).unwrap();
        let err = verify(b"another-secret-another-secret!!", &token).unwrap_err();
        assert!(matches!(err, CareLinkError::Unauthorized));
    }

    #[test]
    fn rejects_tampered_payload() {
        let token = issue(SECRET, "doc@example.org", 3600).unwrap();
        let (_, signature) = token.split_once('.').unwrap();
        let forged_payload =
            URL_SAFE_NO_PAD.encode(r#"{"email":"admin@example.org","iat":0,"exp":9999999999}"#);
        let forged = format!("{forged_payload}.{signature}");
        assert!(matches!(
            verify(SECRET, &forged),
            Err(CareLinkError::Unauthorized)
        ));
    }

    #[test]
    fn rejects_expired_token() {
        let token = issue(SECRET, "doc@example.org", -1).unwrap();
        assert!(matches!(
            verify(SECRET, &token),
            Err(CareLinkError::Unauthorized)
        ));
    }

    #[test]
    fn rejects_garbage() {
        for junk in ["", "abc", "a.b.c", "only-one-part"] {
            assert!(verify(SECRET, junk).is_err(), "accepted {junk:?}");
        }
    }
}
