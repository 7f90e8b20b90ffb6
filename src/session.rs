use base64::Engine;
use serde::Deserialize;

/// Authenticated session: the bearer token plus the identity derived from it.
///
/// Login and signup responses carry the username directly; decoding the
/// token's `sub` claim is only needed when restoring a persisted session.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub username: String,
}

#[derive(Deserialize)]
struct Claims {
    sub: String,
}

impl Session {
    pub fn new(token: String, username: String) -> Self {
        Self { token, username }
    }

    /// Restore a session from a stored token. A missing or corrupt token is
    /// treated as unauthenticated, never as an error.
    pub fn from_token(token: &str) -> Option<Self> {
        let username = decode_subject(token)?;
        Some(Self {
            token: token.to_string(),
            username,
        })
    }
}

/// Pull the `sub` claim out of a JWT without verifying the signature.
/// Validity is the backend's problem; we only need the display identity.
fn decode_subject(token: &str) -> Option<String> {
    let mut parts = token.split('.');
    let _header = parts.next()?;
    let payload = parts.next()?;
    if parts.next().is_none() {
        return None;
    }

    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(payload)
        .ok()?;
    let claims: Claims = serde_json::from_slice(&bytes).ok()?;
    if claims.sub.is_empty() {
        return None;
    }
    Some(claims.sub)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;

    fn make_token(payload: &str) -> String {
        let b64 = |s: &str| base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(s);
        format!("{}.{}.{}", b64(r#"{"alg":"HS256"}"#), b64(payload), "sig")
    }

    #[test]
    fn valid_token_yields_subject_identity() {
        let token = make_token(r#"{"sub":"alice","exp":1999999999}"#);
        let session = Session::from_token(&token).expect("session");
        assert_eq!(session.username, "alice");
        assert_eq!(session.token, token);
    }

    #[test]
    fn corrupt_token_is_unauthenticated() {
        assert!(Session::from_token("not-a-jwt").is_none());
        assert!(Session::from_token("a.%%%.c").is_none());
        assert!(Session::from_token("").is_none());
    }

    #[test]
    fn token_without_subject_is_unauthenticated() {
        let token = make_token(r#"{"exp":1999999999}"#);
        assert!(Session::from_token(&token).is_none());

        let token = make_token(r#"{"sub":""}"#);
        assert!(Session::from_token(&token).is_none());
    }

    #[test]
    fn token_with_wrong_segment_count_is_unauthenticated() {
        let b64 = |s: &str| base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(s);
        let two_parts = format!("{}.{}", b64("{}"), b64(r#"{"sub":"bob"}"#));
        assert!(Session::from_token(&two_parts).is_none());
    }
}
