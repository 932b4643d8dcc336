//! Golden test vector validation.
//!
//! The vectors were generated outside this crate with an independent
//! PBKDF2/AES-GCM implementation, so these tests pin the wire format
//! (`base64(iv || ciphertext)`) rather than just checking that seal and open
//! agree with each other.

use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use serde::Deserialize;

use jotter::crypto::{derive_key, looks_encrypted, open, seal_with_iv, CryptoError, IV_LEN};

#[derive(Debug, Deserialize)]
struct GoldenVector {
    passphrase: String,
    iv: String,
    plaintext: String,
    wire: String,
    comment: String,
}

fn load_golden_vectors() -> Vec<GoldenVector> {
    serde_json::from_str(include_str!("../testdata/golden-vectors.json"))
        .expect("failed to parse golden vectors")
}

fn vector_iv(vector: &GoldenVector) -> [u8; IV_LEN] {
    BASE64_STANDARD
        .decode(&vector.iv)
        .expect("vector iv is not base64")
        .as_slice()
        .try_into()
        .expect("vector iv has the wrong length")
}

#[test]
fn seal_reproduces_golden_wires() {
    for vector in load_golden_vectors() {
        let key = derive_key(&vector.passphrase);
        let wire = seal_with_iv(&key, &vector.plaintext, &vector_iv(&vector)).unwrap();

        assert_eq!(wire, vector.wire, "vector: {}", vector.comment);
    }
}

#[test]
fn open_recovers_golden_plaintexts() {
    for vector in load_golden_vectors() {
        let key = derive_key(&vector.passphrase);

        assert_eq!(
            open(&key, &vector.wire).unwrap(),
            vector.plaintext,
            "vector: {}",
            vector.comment
        );
    }
}

#[test]
fn golden_wires_pass_the_heuristic() {
    for vector in load_golden_vectors() {
        assert!(looks_encrypted(&vector.wire), "vector: {}", vector.comment);
    }
}

#[test]
fn wrong_passphrase_fails_authentication() {
    let key = derive_key("definitely not the vector passphrase");

    for vector in load_golden_vectors() {
        assert!(
            matches!(open(&key, &vector.wire), Err(CryptoError::Decrypt)),
            "vector: {}",
            vector.comment
        );
    }
}

#[test]
fn flipped_ciphertext_bit_fails_authentication() {
    for vector in load_golden_vectors() {
        let key = derive_key(&vector.passphrase);

        let mut bytes = BASE64_STANDARD.decode(&vector.wire).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        let tampered = BASE64_STANDARD.encode(bytes);

        assert!(
            matches!(open(&key, &tampered), Err(CryptoError::Decrypt)),
            "vector: {}",
            vector.comment
        );
    }
}

#[test]
fn truncated_wire_is_malformed() {
    let vector = &load_golden_vectors()[0];
    let key = derive_key(&vector.passphrase);

    let bytes = BASE64_STANDARD.decode(&vector.wire).unwrap();
    let truncated = BASE64_STANDARD.encode(&bytes[..IV_LEN + 3]);

    assert!(matches!(
        open(&key, &truncated),
        Err(CryptoError::Malformed)
    ));
}
