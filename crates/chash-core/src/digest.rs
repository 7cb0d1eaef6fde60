use std::fmt;

use thiserror::Error;

use crate::encode;

pub const DIGEST_LEN: usize = 32;

/// Finished SHA-256 output. Always exactly 32 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha256Digest([u8; DIGEST_LEN]);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("digest must be {DIGEST_LEN} bytes, got {0}")]
pub struct DigestLenError(pub usize);

impl Sha256Digest {
    pub fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    pub fn to_hex(&self, uppercase: bool) -> String {
        encode::to_hex(self, uppercase)
    }

    pub fn to_base64(&self) -> String {
        encode::to_base64(self)
    }
}

impl TryFrom<&[u8]> for Sha256Digest {
    type Error = DigestLenError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; DIGEST_LEN] = value.try_into().map_err(|_| DigestLenError(value.len()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex(false))
    }
}
