use crate::utils::auth::constant_time_eq;
use pbkdf2::pbkdf2_hmac;
use rand::Rng;
use sha2::Sha256;

const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;

/// Salted PBKDF2-HMAC-SHA256 digest of a password, hex-encoded for storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash {
    pub salt: String,
    pub hash: String,
    pub iterations: u32,
}

impl PasswordHash {
    /// Hash `password` with a fresh random salt
    pub fn generate(password: &str, iterations: u32) -> Self {
        let mut salt = [0u8; SALT_LEN];
        rand::rng().fill(&mut salt);

        let digest = derive(password, &salt, iterations);

        Self {
            salt: hex::encode(salt),
            hash: hex::encode(digest),
            iterations,
        }
    }

    /// Check `password` against this stored hash.
    ///
    /// A salt or hash that is not valid hex never verifies.
    pub fn verify(&self, password: &str) -> bool {
        let (Ok(salt), Ok(expected)) = (hex::decode(&self.salt), hex::decode(&self.hash)) else {
            return false;
        };

        let digest = derive(password, &salt, self.iterations);
        constant_time_eq(&digest, &expected)
    }
}

fn derive(password: &str, salt: &[u8], iterations: u32) -> [u8; HASH_LEN] {
    let mut out = [0u8; HASH_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut out);
    out
}
