/// Password hashing using Argon2id
///
/// Registration stores only the PHC string produced by [`hash_password`];
/// login checks the submitted password against it with [`verify_password`].
/// Every stored hash uses the same cost: 64 MiB of memory, 3 passes, 4 lanes,
/// a 16-byte random salt and a 32-byte output.
///
/// # Example
///
/// ```
/// use todo_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let stored = hash_password("Abcdef1!")?;
///
/// assert!(verify_password("Abcdef1!", &stored)?);
/// assert!(!verify_password("abcdef1!", &stored)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

const MEMORY_KIB: u32 = 65_536;
const PASSES: u32 = 3;
const LANES: u32 = 4;
const OUTPUT_LEN: usize = 32;

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Hashing a new password failed
    #[error("Failed to hash password: {0}")]
    Hash(String),

    /// The stored hash cannot be used for verification
    #[error("Stored password hash is corrupt: {0}")]
    CorruptHash(String),

    /// Verification failed for a reason other than a wrong password
    #[error("Failed to verify password: {0}")]
    Verify(String),
}

fn hasher() -> Result<Argon2<'static>, PasswordError> {
    let params = Params::new(MEMORY_KIB, PASSES, LANES, Some(OUTPUT_LEN))
        .map_err(|e| PasswordError::Hash(format!("Invalid parameters: {}", e)))?;

    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hashes a password into a PHC string with a fresh random salt
///
/// ```text
/// $argon2id$v=19$m=65536,t=3,p=4$<salt>$<hash>
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hash(e.to_string()))?;

    Ok(hash.to_string())
}

/// Checks a password against a stored PHC string
///
/// The cost parameters are read from the stored string. Comparison is
/// constant-time.
///
/// # Returns
///
/// `Ok(true)` on a match, `Ok(false)` on a wrong password
///
/// # Errors
///
/// `PasswordError::CorruptHash` if the stored string does not parse or has
/// no hash output; such a row can never authenticate anyone.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, PasswordError> {
    let parsed =
        PasswordHash::new(stored).map_err(|e| PasswordError::CorruptHash(e.to_string()))?;

    if parsed.hash.is_none() {
        return Err(PasswordError::CorruptHash("missing hash output".to_string()));
    }

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::Verify(e.to_string())),
    }
}
