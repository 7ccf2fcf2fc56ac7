//! Signed session cookie.
//!
//! The cookie value is `base64url(json claims) "." base64url(hmac-sha256)`,
//! keyed with the configured session secret. Nothing is stored server side;
//! logging out removes the cookie and an expired `issued_at` invalidates it.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::{engine::general_purpose, Engine as _};
use cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

pub const SESSION_COOKIE: &str = "session";

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub user_id: i64,
    pub username: String,
    pub issued_at: u64,
}

#[derive(Clone)]
pub struct SessionKeys {
    secret: Vec<u8>,
    ttl: Duration,
}

impl SessionKeys {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
            ttl,
        }
    }

    pub fn issue(&self, user_id: i64, username: &str) -> String {
        self.encode(&SessionClaims {
            user_id,
            username: username.to_string(),
            issued_at: now_secs(),
        })
    }

    pub fn encode(&self, claims: &SessionClaims) -> String {
        let payload = serde_json::to_vec(claims).unwrap_or_default();
        let payload = general_purpose::URL_SAFE_NO_PAD.encode(payload);
        let signature = general_purpose::URL_SAFE_NO_PAD.encode(self.sign(payload.as_bytes()));
        format!("{}.{}", payload, signature)
    }

    /// Returns the claims for a well-formed, correctly signed, unexpired token.
    pub fn decode(&self, token: &str) -> Option<SessionClaims> {
        let (payload, signature) = token.split_once('.')?;
        let signature = general_purpose::URL_SAFE_NO_PAD.decode(signature).ok()?;

        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature).ok()?;

        let bytes = general_purpose::URL_SAFE_NO_PAD.decode(payload).ok()?;
        let claims: SessionClaims = serde_json::from_slice(&bytes).ok()?;

        let age = now_secs().saturating_sub(claims.issued_at);
        if age > self.ttl.as_secs() {
            return None;
        }
        Some(claims)
    }

    pub fn cookie(&self, token: String) -> Cookie<'static> {
        let mut cookie = Cookie::new(SESSION_COOKIE, token);
        cookie.set_path("/");
        cookie.set_http_only(true);
        cookie.set_same_site(SameSite::Lax);
        cookie.set_max_age(CookieDuration::seconds(
            i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX),
        ));
        cookie
    }

    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = Cookie::new(SESSION_COOKIE, "");
        cookie.set_path("/");
        cookie.set_http_only(true);
        cookie.set_same_site(SameSite::Lax);
        cookie.make_removal();
        cookie
    }

    fn sign(&self, payload: &[u8]) -> Vec<u8> {
        let mut mac = self.mac();
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }

    fn mac(&self) -> HmacSha256 {
        <HmacSha256 as Mac>::new_from_slice(&self.secret).expect("HMAC accepts any key length")
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
