//! services/api/src/adapters/password.rs
//!
//! PBKDF2-HMAC-SHA256 implementation of the `PasswordHasher` port.
//!
//! The derivation is keyed by a single server-held salt, so equal passwords
//! always produce equal stored hashes.

use reading_tracker_core::ports::{PasswordHasher, PortError, PortResult};
use ring::pbkdf2;
use std::num::NonZeroU32;

/// Number of PBKDF2 iterations.
const ITERATIONS: u32 = 1000;

/// Length of the derived key in bytes; stored as twice as many hex characters.
const HASH_LENGTH: usize = 64;

/// An adapter that implements the `PasswordHasher` port with PBKDF2.
#[derive(Clone)]
pub struct Pbkdf2Hasher {
    salt: Vec<u8>,
}

impl Pbkdf2Hasher {
    pub fn new(salt: impl Into<String>) -> Self {
        Self {
            salt: salt.into().into_bytes(),
        }
    }
}

impl PasswordHasher for Pbkdf2Hasher {
    fn hash(&self, password: &str) -> PortResult<String> {
        let iterations = NonZeroU32::new(ITERATIONS)
            .ok_or_else(|| PortError::Unexpected("PBKDF2 iteration count is zero".to_string()))?;
        let mut derived = [0u8; HASH_LENGTH];
        pbkdf2::derive(
            pbkdf2::PBKDF2_HMAC_SHA256,
            iterations,
            &self.salt,
            password.as_bytes(),
            &mut derived,
        );
        Ok(hex::encode(derived))
    }
}
