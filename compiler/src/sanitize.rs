// sanitize.rs — HDL identifier sanitization
//
// Block ids and type names are free-form strings. Verilog identifiers may not
// contain `-`, so such names (and every type name used as a module suffix) are
// replaced by a digest token: `v` followed by the first 6 hex digits of the
// name's digest.
//
// Preconditions: none.
// Postconditions: output is stable for a given (name, force, digest).
// Failure modes: none (total over all strings).
// Side effects: none.

use sha1::{Digest, Sha1};

/// Number of hex digits kept from the digest.
pub const DIGEST_LEN: usize = 6;

/// A pure digest function returning lowercase hex.
pub type DigestFn = fn(&[u8]) -> String;

/// SHA-1 of `input` as 40 lowercase hex digits.
pub fn sha1_hex(input: &[u8]) -> String {
    bytes_to_hex(&Sha1::digest(input))
}

/// Lowercase hex encoding of `bytes`.
pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        use std::fmt::Write;
        let _ = write!(s, "{:02x}", b);
    }
    s
}

/// Identifier sanitizer with an injected digest function.
#[derive(Clone, Copy)]
pub struct Sanitizer {
    digest: DigestFn,
}

impl Default for Sanitizer {
    fn default() -> Self {
        Sanitizer { digest: sha1_hex }
    }
}

impl std::fmt::Debug for Sanitizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sanitizer").finish_non_exhaustive()
    }
}

impl Sanitizer {
    pub fn new(digest: DigestFn) -> Self {
        Sanitizer { digest }
    }

    /// Sanitize `name` for use as an HDL identifier.
    ///
    /// Names containing `-` are always replaced by a digest token; with
    /// `force` every name is.
    pub fn sanitize(&self, name: &str, force: bool) -> String {
        if force || name.contains('-') {
            self.token(name)
        } else {
            name.to_string()
        }
    }

    fn token(&self, name: &str) -> String {
        let hex = (self.digest)(name.as_bytes());
        let mut token = String::with_capacity(DIGEST_LEN + 1);
        token.push('v');
        token.extend(hex.chars().take(DIGEST_LEN));
        token
    }
}

/// Sanitize with the default SHA-1 digest.
pub fn sanitize(name: &str, force: bool) -> String {
    Sanitizer::default().sanitize(name, force)
}
