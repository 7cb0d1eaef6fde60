//! Text renderings of a finished digest.

use base64::prelude::*;

use crate::digest::Sha256Digest;

/// Two characters per byte, high nibble first.
pub fn to_hex(digest: &Sha256Digest, uppercase: bool) -> String {
    if uppercase {
        hex::encode_upper(digest.as_bytes())
    } else {
        hex::encode(digest.as_bytes())
    }
}

/// Standard alphabet with `=` padding (RFC 4648). 32 bytes always render as 44 chars.
pub fn to_base64(digest: &Sha256Digest) -> String {
    BASE64_STANDARD.encode(digest.as_bytes())
}
