pub mod claims;
pub mod extractors;
pub mod guards;
pub mod middleware;

pub use claims::{AuthUser, Claims};

use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use util::config;

/// Issues an HS256 token for the given user. Returns the token and its
/// expiry as a unix timestamp.
pub fn generate_jwt(user_id: i64, admin: bool) -> (String, i64) {
    let expires_at = Utc::now() + Duration::minutes(config::jwt_duration_minutes() as i64);
    let claims = Claims {
        sub: user_id,
        exp: expires_at.timestamp() as usize,
        admin,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config::jwt_secret().as_bytes()),
    )
    .expect("JWT encoding cannot fail with HS256");
    (token, expires_at.timestamp())
}
