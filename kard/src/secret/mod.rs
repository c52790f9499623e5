//! Secret files at rest.
//!
//! A secret is a pair of paths: the plaintext file and its `.enc` sibling.
//! Swapping encrypts (or decrypts) one into the other, writes the new file
//! with owner-only permissions and then removes the old one.
//!
//! The swap is not atomic. A crash between the write and the removal leaves
//! both files on disk; [`SecretFile::state`] reports that as
//! [`SecretState::Both`] so callers can notice and clean up.

pub mod codec;

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Suffix appended to a plaintext file name to form its encrypted sibling.
pub const ENCRYPTED_SUFFIX: &str = ".enc";

/// Read `path` and return its encrypted contents.
///
/// # Errors
///
/// Returns [`Error::PasswordRequired`] without a passphrase, or an I/O error
/// if the file cannot be read.
pub fn encrypt_file(path: &Path, passphrase: Option<&str>) -> Result<Vec<u8>> {
    let passphrase = passphrase.ok_or(Error::PasswordRequired)?;
    let plain = fs::read(path).map_err(|e| Error::io(path, e))?;
    Ok(codec::encrypt(&plain, passphrase))
}

/// Read `path` and return its decrypted contents.
///
/// # Errors
///
/// Returns [`Error::PasswordRequired`] without a passphrase,
/// [`Error::DecryptionIntegrity`] naming `path` if the passphrase is wrong,
/// or an I/O error if the file cannot be read.
pub fn decrypt_file(path: &Path, passphrase: Option<&str>) -> Result<Vec<u8>> {
    let passphrase = passphrase.ok_or(Error::PasswordRequired)?;
    let sealed = fs::read(path).map_err(|e| Error::io(path, e))?;
    codec::decrypt(&sealed, passphrase).map_err(|err| match err {
        Error::DecryptionIntegrity { .. } => Error::DecryptionIntegrity {
            path: path.to_path_buf(),
        },
        other => other,
    })
}

/// Replace `plain` with its encrypted form at `encrypted`.
///
/// # Errors
///
/// Returns an error if no passphrase is given or any file operation fails.
/// If the removal of `plain` fails, both files remain.
pub fn encrypt_swap(plain: &Path, encrypted: &Path, passphrase: Option<&str>) -> Result<()> {
    let sealed = encrypt_file(plain, passphrase)?;
    write_private(encrypted, &sealed)?;
    fs::remove_file(plain).map_err(|e| Error::io(plain, e))?;
    log::info!("encrypted {} -> {}", plain.display(), encrypted.display());
    Ok(())
}

/// Replace `encrypted` with its decrypted form at `plain`.
///
/// # Errors
///
/// Returns an error if no passphrase is given, the passphrase is wrong, or
/// any file operation fails. Nothing is written when decryption fails.
pub fn decrypt_swap(plain: &Path, encrypted: &Path, passphrase: Option<&str>) -> Result<()> {
    let opened = decrypt_file(encrypted, passphrase)?;
    write_private(plain, &opened)?;
    fs::remove_file(encrypted).map_err(|e| Error::io(encrypted, e))?;
    log::info!("decrypted {} -> {}", encrypted.display(), plain.display());
    Ok(())
}

fn write_private(path: &Path, contents: &[u8]) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path).map_err(|e| Error::io(path, e))?;
    // mode() only applies to newly created files
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))
            .map_err(|e| Error::io(path, e))?;
    }
    file.write_all(contents).map_err(|e| Error::io(path, e))?;
    Ok(())
}

/// Which halves of a secret pair exist on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretState {
    /// Only the plaintext file exists.
    Plain,
    /// Only the encrypted file exists.
    Encrypted,
    /// Both exist; a previous swap was interrupted.
    Both,
    /// Neither exists.
    Missing,
}

/// A plaintext path and its encrypted sibling.
///
/// # Examples
///
/// ```
/// use kard::secret::SecretFile;
/// use std::path::Path;
///
/// let secret = SecretFile::new("kard/dev/secrets.yml");
/// assert_eq!(secret.encrypted(), Path::new("kard/dev/secrets.yml.enc"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretFile {
    plain: PathBuf,
    encrypted: PathBuf,
}

impl SecretFile {
    /// Pair `plain` with `<plain>.enc`.
    pub fn new(plain: impl Into<PathBuf>) -> Self {
        let plain = plain.into();
        let mut encrypted = plain.clone().into_os_string();
        encrypted.push(ENCRYPTED_SUFFIX);
        Self {
            plain,
            encrypted: PathBuf::from(encrypted),
        }
    }

    /// The plaintext path.
    #[must_use]
    pub fn plain(&self) -> &Path {
        &self.plain
    }

    /// The encrypted path.
    #[must_use]
    pub fn encrypted(&self) -> &Path {
        &self.encrypted
    }

    /// Inspect the filesystem for the pair.
    #[must_use]
    pub fn state(&self) -> SecretState {
        match (self.plain.is_file(), self.encrypted.is_file()) {
            (true, false) => SecretState::Plain,
            (false, true) => SecretState::Encrypted,
            (true, true) => SecretState::Both,
            (false, false) => SecretState::Missing,
        }
    }

    /// Encrypt the plaintext file and remove it.
    ///
    /// # Errors
    ///
    /// See [`encrypt_swap`].
    pub fn encrypt(&self, passphrase: Option<&str>) -> Result<()> {
        encrypt_swap(&self.plain, &self.encrypted, passphrase)
    }

    /// Decrypt the encrypted file and remove it.
    ///
    /// # Errors
    ///
    /// See [`decrypt_swap`].
    pub fn decrypt(&self, passphrase: Option<&str>) -> Result<()> {
        decrypt_swap(&self.plain, &self.encrypted, passphrase)
    }
}
