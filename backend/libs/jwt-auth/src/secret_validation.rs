//! Secret strength assessment for HMAC signing keys
//!
//! Secrets are raw bytes: anything from a UTF-8 passphrase to the output of a
//! key generator. Weak secrets make HS256 tokens forgeable by offline brute
//! force, so the manager reports them at startup.

use anyhow::{anyhow, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use ring::rand::{SecureRandom, SystemRandom};
use std::fmt;
use zeroize::Zeroizing;

/// HS256 key size: 256 bits
pub const MIN_SECRET_LENGTH: usize = 32;
const RECOMMENDED_SECRET_LENGTH: usize = 64;
const MIN_ENTROPY_BITS_PER_BYTE: f64 = 4.0;
const STRONG_ENTROPY_BITS_PER_BYTE: f64 = 5.0;
const MAX_RUN: usize = 4;

/// Secret strength classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretStrength {
    Weak,
    Acceptable,
    Strong,
}

/// First reason a secret is classified [`SecretStrength::Weak`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SecretWeakness {
    TooShort { len: usize },
    LowEntropy { bits_per_byte: f64 },
    /// `MAX_RUN` bytes stepping by -1, 0 or +1 (`aaaa`, `1234`, `\xff\xfe\xfd\xfc`)
    Run { offset: usize },
}

impl fmt::Display for SecretWeakness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { len } => {
                write!(f, "{len} bytes, need at least {MIN_SECRET_LENGTH}")
            }
            Self::LowEntropy { bits_per_byte } => {
                write!(f, "entropy {bits_per_byte:.2} bits/byte")
            }
            Self::Run { offset } => write!(f, "predictable byte run at offset {offset}"),
        }
    }
}

/// Why `secret` is weak, or `None` if it passes every check
pub fn find_weakness(secret: &[u8]) -> Option<SecretWeakness> {
    if secret.len() < MIN_SECRET_LENGTH {
        return Some(SecretWeakness::TooShort { len: secret.len() });
    }

    let bits_per_byte = shannon_entropy(secret);
    if bits_per_byte < MIN_ENTROPY_BITS_PER_BYTE {
        return Some(SecretWeakness::LowEntropy { bits_per_byte });
    }

    find_run(secret).map(|offset| SecretWeakness::Run { offset })
}

/// Classify an HMAC secret.
///
/// Strong needs 64+ bytes at 5+ bits/byte; anything that passes
/// [`find_weakness`] short of that is Acceptable.
pub fn validate_secret_strength(secret: &[u8]) -> SecretStrength {
    if find_weakness(secret).is_some() {
        SecretStrength::Weak
    } else if secret.len() >= RECOMMENDED_SECRET_LENGTH
        && shannon_entropy(secret) >= STRONG_ENTROPY_BITS_PER_BYTE
    {
        SecretStrength::Strong
    } else {
        SecretStrength::Acceptable
    }
}

/// Bits per byte, 0-8
fn shannon_entropy(data: &[u8]) -> f64 {
    let mut freq = [0u32; 256];
    for &byte in data {
        freq[usize::from(byte)] += 1;
    }

    let len = data.len() as f64;
    freq.iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = f64::from(count) / len;
            -p * p.log2()
        })
        .sum()
}

/// Offset of the first run of `MAX_RUN` bytes with a constant step of -1, 0 or +1
fn find_run(data: &[u8]) -> Option<usize> {
    data.windows(MAX_RUN).position(|window| {
        let step = i16::from(window[1]) - i16::from(window[0]);
        step.abs() <= 1
            && window
                .windows(2)
                .all(|pair| i16::from(pair[1]) - i16::from(pair[0]) == step)
    })
}

/// `length` random bytes from the system CSPRNG, zeroed on drop
pub fn generate_secret_bytes(length: usize) -> Result<Zeroizing<Vec<u8>>> {
    if length < MIN_SECRET_LENGTH {
        return Err(anyhow!(
            "Secret length must be at least {MIN_SECRET_LENGTH} bytes, got {length}"
        ));
    }

    let mut buffer = Zeroizing::new(vec![0u8; length]);
    SystemRandom::new()
        .fill(buffer.as_mut_slice())
        .map_err(|_| anyhow!("System random source unavailable"))?;

    Ok(buffer)
}

/// [`generate_secret_bytes`] as standard base64, for `JWT_SECRET` in `.env` files
///
/// The manager signs with the encoded text itself, not the decoded bytes.
pub fn generate_secure_secret(length: usize) -> Result<String> {
    generate_secret_bytes(length).map(|bytes| STANDARD.encode(bytes.as_slice()))
}
