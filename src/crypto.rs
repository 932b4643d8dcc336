//! Reference implementation of the note encryption recipe.
//!
//! The real encryption happens in the browser (assets/crypto.js): a key is
//! derived from the user's passphrase with PBKDF2-HMAC-SHA256 and notes are
//! sealed with AES-256-GCM before they are submitted. The server never sees
//! the passphrase or the key, it only stores the resulting opaque string.
//!
//! This module mirrors that recipe so the wire format has a tested
//! counterpart and so the page renderer can inject the exact same constants
//! into the script. The wire format is:
//! - iv: 12 bytes, random per encryption
//! - ciphertext + GCM tag: variable length
//! encoded together as `base64(iv || ciphertext)`.

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use thiserror::Error;

/// PBKDF2 iteration count, shared with the browser script.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Fixed application salt for key derivation, shared with the browser script.
///
/// A fixed salt means equal passphrases derive equal keys across lists. That
/// is a deliberate property of this application, not an oversight: there is
/// no place to store a per-list salt that the server could not tamper with.
pub const KDF_SALT: &[u8] = b"jotter.notes.v1";

/// Length of the AES-GCM IV in bytes (96 bit, standard recommendation)
pub const IV_LEN: usize = 12;

/// Length of the derived key in bytes
pub const KEY_LEN: usize = 32;

/// Length of the GCM authentication tag in bytes
const TAG_LEN: usize = 16;

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("encryption failed")]
    Encrypt,

    #[error("not a recognizable ciphertext")]
    Malformed,

    #[error("decryption failed: wrong passphrase or corrupted data")]
    Decrypt,

    #[error("decrypted payload is not valid UTF-8")]
    Utf8,
}

/// Derive a 32-byte AES key from a passphrase.
pub fn derive_key(passphrase: &str) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(passphrase.as_bytes(), KDF_SALT, PBKDF2_ITERATIONS, &mut key);
    key
}

/// Encrypt a note with a fresh random IV, returning the wire string.
pub fn seal(key: &[u8; KEY_LEN], plaintext: &str) -> Result<String, CryptoError> {
    let iv = Aes256Gcm::generate_nonce(&mut OsRng);
    seal_with_iv(key, plaintext, &iv.into())
}

/// Encrypt a note with a caller-provided IV.
///
/// Only meant for golden-vector tests where deterministic output is needed.
/// Production callers use `seal`, which never reuses an IV.
pub fn seal_with_iv(
    key: &[u8; KEY_LEN],
    plaintext: &str,
    iv: &[u8; IV_LEN],
) -> Result<String, CryptoError> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(iv), plaintext.as_bytes())
        .map_err(|_| CryptoError::Encrypt)?;

    let mut wire = Vec::with_capacity(IV_LEN + ciphertext.len());
    wire.extend_from_slice(iv);
    wire.extend_from_slice(&ciphertext);

    Ok(BASE64_STANDARD.encode(wire))
}

/// Decrypt a wire string produced by `seal` (or the browser script).
pub fn open(key: &[u8; KEY_LEN], wire: &str) -> Result<String, CryptoError> {
    let bytes = BASE64_STANDARD
        .decode(wire)
        .map_err(|_| CryptoError::Malformed)?;

    if bytes.len() < IV_LEN + TAG_LEN {
        return Err(CryptoError::Malformed);
    }

    let (iv, ciphertext) = bytes.split_at(IV_LEN);

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    let plaintext = cipher
        .decrypt(Nonce::from_slice(iv), ciphertext)
        .map_err(|_| CryptoError::Decrypt)?;

    String::from_utf8(plaintext).map_err(|_| CryptoError::Utf8)
}

/// Heuristic used when notes come back from the server: could this string be
/// our wire format? Anything that strictly base64-decodes to at least
/// IV + tag bytes might be, and gets a decryption attempt (a failed attempt
/// falls back to showing the raw string). Everything else is plaintext.
pub fn looks_encrypted(text: &str) -> bool {
    match BASE64_STANDARD.decode(text) {
        Ok(bytes) => bytes.len() >= IV_LEN + TAG_LEN,
        Err(_) => false,
    }
}
