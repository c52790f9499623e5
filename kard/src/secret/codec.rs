//! Passphrase-based AES-256-CBC encryption of byte buffers.
//!
//! The key is the SHA-256 digest of the passphrase. Every encryption draws a
//! fresh 16-byte IV from the operating system and prepends it to the output,
//! so the wire format is `IV || ciphertext` with PKCS#7 padding.

use std::path::PathBuf;

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Cipher block size in bytes; also the IV length.
pub const BLOCK_SIZE: usize = 16;

/// Encrypt `plain` with a key derived from `passphrase`.
///
/// The output is always `BLOCK_SIZE` bytes of IV followed by at least one
/// block of ciphertext, even for empty input.
///
/// # Examples
///
/// ```
/// use kard::secret::codec::{decrypt, encrypt, BLOCK_SIZE};
///
/// let sealed = encrypt(b"token: abc", "pw");
/// assert_eq!(sealed.len(), 2 * BLOCK_SIZE);
/// assert_eq!(decrypt(&sealed, "pw").unwrap(), b"token: abc");
/// ```
#[must_use]
pub fn encrypt(plain: &[u8], passphrase: &str) -> Vec<u8> {
    let key = Sha256::digest(passphrase.as_bytes());
    let mut iv = [0u8; BLOCK_SIZE];
    OsRng.fill_bytes(&mut iv);

    let ciphertext = Aes256CbcEnc::new(&key, &iv.into()).encrypt_padded_vec_mut::<Pkcs7>(plain);

    let mut sealed = Vec::with_capacity(BLOCK_SIZE + ciphertext.len());
    sealed.extend_from_slice(&iv);
    sealed.extend_from_slice(&ciphertext);
    sealed
}

/// Decrypt data produced by [`encrypt`].
///
/// # Errors
///
/// Returns [`Error::DecryptionIntegrity`] (with path `-`) when the input is
/// too short or the padding does not validate, which means the passphrase is
/// wrong or the data is corrupted.
pub fn decrypt(sealed: &[u8], passphrase: &str) -> Result<Vec<u8>> {
    let integrity = || Error::DecryptionIntegrity {
        path: PathBuf::from("-"),
    };

    if sealed.len() < BLOCK_SIZE {
        return Err(integrity());
    }
    let (iv, ciphertext) = sealed.split_at(BLOCK_SIZE);

    let key = Sha256::digest(passphrase.as_bytes());
    let mut iv_block = [0u8; BLOCK_SIZE];
    iv_block.copy_from_slice(iv);

    Aes256CbcDec::new(&key, &iv_block.into())
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| integrity())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_round_trip_empty() {
        let sealed = encrypt(b"", "pw");
        assert_eq!(sealed.len(), 2 * BLOCK_SIZE);
        assert_eq!(decrypt(&sealed, "pw").unwrap(), b"");
    }

    #[test]
    fn test_round_trip_block_aligned() {
        let plain = [7u8; BLOCK_SIZE];
        let sealed = encrypt(&plain, "pw");
        // aligned input still gets a full block of padding
        assert_eq!(sealed.len(), 3 * BLOCK_SIZE);
        assert_eq!(decrypt(&sealed, "pw").unwrap(), plain);
    }

    #[test]
    fn test_fresh_iv_per_call() {
        let first = encrypt(b"same", "pw");
        let second = encrypt(b"same", "pw");
        assert_ne!(first, second);
    }

    #[test]
    fn test_wrong_passphrase_rejected() {
        let plain = b"db_password: hunter2\n";
        let mut rejected = 0;
        for _ in 0..8 {
            let sealed = encrypt(plain, "pw1");
            match decrypt(&sealed, "pw2") {
                Err(err) => {
                    assert!(err.is_decryption_failure());
                    rejected += 1;
                }
                Ok(garbage) => assert_ne!(garbage, plain),
            }
        }
        assert!(rejected >= 6, "only {rejected} of 8 wrong-key decryptions failed");
    }

    #[test]
    fn test_short_input_rejected() {
        let err = decrypt(&[0u8; 5], "pw").unwrap_err();
        assert!(err.is_decryption_failure());
    }

    #[test]
    fn test_iv_only_rejected() {
        let sealed = encrypt(b"abc", "pw");
        let err = decrypt(&sealed[..BLOCK_SIZE], "pw").unwrap_err();
        assert!(err.is_decryption_failure());
    }

    #[test]
    fn test_truncated_ciphertext_rejected() {
        let sealed = encrypt(b"some longer plaintext value", "pw");
        let err = decrypt(&sealed[..sealed.len() - 3], "pw").unwrap_err();
        assert!(err.is_decryption_failure());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            .. ProptestConfig::default()
        })]

        #[test]
        fn round_trip_any_bytes(plain in prop::collection::vec(any::<u8>(), 0..200), passphrase in ".{0,24}") {
            let sealed = encrypt(&plain, &passphrase);
            prop_assert_eq!(sealed.len() % BLOCK_SIZE, 0);
            prop_assert_eq!(decrypt(&sealed, &passphrase).unwrap(), plain);
        }
    }
}
