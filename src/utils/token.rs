use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand_core::{OsRng, RngCore};
use uuid::Uuid;

pub fn new_id() -> Uuid {
    Uuid::new_v4()
}

pub fn new_token() -> String {
    let mut buf = [0u8; 32];
    let mut rng = OsRng;
    rng.fill_bytes(&mut buf);
    format!("tok_{}", URL_SAFE_NO_PAD.encode(buf))
}

/// Bearer tokens are "{user_id}.{secret}"; the secret half is stored hashed.
pub fn construct_token(user_id: &Uuid, secret: &str) -> String {
    format!("{}.{}", user_id, secret)
}

pub fn extract_token_parts(token: &str) -> Option<(Uuid, &str)> {
    let (id, secret) = token.split_once('.')?;
    let uuid = Uuid::parse_str(id).ok()?;
    if secret.is_empty() {
        return None;
    }
    Some((uuid, secret))
}

pub fn encrypt(raw: &str) -> Result<String, argon2::password_hash::Error> {
    let mut rng = OsRng;
    let salt = SaltString::generate(&mut rng);
    let hash = Argon2::default().hash_password(raw.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

pub fn verify(raw: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(hash)?;
    Ok(Argon2::default()
        .verify_password(raw.as_bytes(), &parsed)
        .is_ok())
}
