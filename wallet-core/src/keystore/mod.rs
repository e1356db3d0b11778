// wallet-core/src/keystore/mod.rs
//
// Encrypted Keystore - one Web3 Secret Storage file per address
//
// store: KeyMaterial + password → scrypt → AES-128-CTR + MAC → atomic write
// load:  file + password → KDF → MAC check → decrypt → address check → KeyMaterial

pub mod file;
pub mod json;

pub use json::{decrypt_key, encrypt_key, EncryptedKeyFile, KdfKind, KdfParams};

use crate::chains::evm::{EvmAddress, KeyMaterial};
use crate::config::ScryptCost;
use crate::error::{AuthFailure, KeystoreError, WalletError, WalletResult};
use alloy::primitives::Address;
use std::path::{Path, PathBuf};

/// Keystore directory handle
#[derive(Debug, Clone)]
pub struct Keystore {
    dir: PathBuf,
    scrypt: ScryptCost,
}

impl Keystore {
    pub fn new(dir: impl Into<PathBuf>, scrypt: ScryptCost) -> Self {
        Self {
            dir: dir.into(),
            scrypt,
        }
    }

    #[inline]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<dir>/0x<EIP-55 address>`
    pub fn path_for(&self, address: &Address) -> PathBuf {
        self.dir.join(address.to_checksum(None))
    }

    /// Address encoded in a keystore file name, if it is one
    pub fn address_from_path(path: &Path) -> Option<Address> {
        let name = path.file_name()?.to_str()?;
        let name = name.strip_suffix(".json").unwrap_or(name);
        if !name.starts_with("0x") {
            return None;
        }
        EvmAddress::parse(name).ok()
    }

    /// Encrypt and persist under [`Keystore::path_for`]
    pub fn store(&self, key: &KeyMaterial, password: &str) -> WalletResult<PathBuf> {
        let path = self.path_for(&key.address());
        self.store_at(key, password, &path)?;
        Ok(path)
    }

    /// Encrypt and persist at an explicit destination
    pub fn store_at(&self, key: &KeyMaterial, password: &str, path: &Path) -> WalletResult<()> {
        let document = encrypt_key(key, password, self.scrypt)?;
        let content = document.to_json()?;
        file::write_key_file(path, &content)?;

        tracing::info!(address = %key.address(), path = %path.display(), "keystore stored");
        Ok(())
    }

    /// Read, verify and decrypt
    ///
    /// `expected` is checked in addition to the address recorded in the file.
    pub fn load(
        &self,
        path: &Path,
        password: &str,
        expected: Option<Address>,
    ) -> WalletResult<KeyMaterial> {
        let content = file::read_key_file(path)?;
        let document = EncryptedKeyFile::from_json(&content)?;
        let key = decrypt_key(&document, password)?;

        if let Some(expected) = expected {
            if key.address() != expected {
                tracing::warn!(expected = %expected, derived = %key.address(), "keystore address check failed");
                return Err(WalletError::Keystore(KeystoreError::Authentication(
                    AuthFailure::AddressMismatch {
                        expected: expected.to_checksum(None),
                        found: key.address().to_checksum(None),
                    },
                )));
            }
        }

        tracing::info!(address = %key.address(), path = %path.display(), "keystore loaded");
        Ok(key)
    }

    /// Addresses that have a keystore file in this directory
    pub fn accounts(&self) -> WalletResult<Vec<Address>> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(WalletError::Keystore(KeystoreError::Io(format!(
                    "failed to list {}: {}",
                    self.dir.display(),
                    e
                ))))
            }
        };

        let mut accounts: Vec<Address> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| Self::address_from_path(&entry.path()))
            .collect();
        accounts.sort();
        Ok(accounts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_PRIVATE_KEY: &str =
        "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn test_key() -> KeyMaterial {
        KeyMaterial::from_slice(&hex::decode(TEST_PRIVATE_KEY).unwrap()).unwrap()
    }

    #[test]
    fn test_store_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let keystore = Keystore::new(dir.path(), ScryptCost::Light);
        let key = test_key();

        let path = keystore.store(&key, "hunter2").unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );

        let loaded = keystore.load(&path, "hunter2", Some(key.address())).unwrap();
        assert!(loaded.same_key(&key));
        assert_eq!(keystore.accounts().unwrap(), vec![key.address()]);
    }

    #[test]
    fn test_address_from_path() {
        let path = Path::new("/ks/0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
        assert_eq!(
            Keystore::address_from_path(path).unwrap(),
            test_key().address()
        );
        assert!(Keystore::address_from_path(Path::new("/ks/notes.txt")).is_none());
    }

    #[test]
    fn test_expected_address_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let keystore = Keystore::new(dir.path(), ScryptCost::Light);
        let path = keystore.store(&test_key(), "pw").unwrap();

        let other = Address::repeat_byte(0x11);
        let err = keystore.load(&path, "pw", Some(other)).unwrap_err();
        assert!(matches!(
            err,
            WalletError::Keystore(KeystoreError::Authentication(AuthFailure::AddressMismatch { .. }))
        ));
    }

    #[test]
    fn test_corrupted_ciphertext_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let keystore = Keystore::new(dir.path(), ScryptCost::Light);
        let path = keystore.store(&test_key(), "pw").unwrap();

        let mut document =
            EncryptedKeyFile::from_json(&std::fs::read(&path).unwrap()).unwrap();
        document.crypto.ciphertext[5] ^= 0xff;
        std::fs::write(&path, document.to_json().unwrap()).unwrap();

        let err = keystore.load(&path, "pw", None).unwrap_err();
        assert!(err.is_authentication());
    }

    #[test]
    fn test_load_missing() {
        let dir = tempfile::tempdir().unwrap();
        let keystore = Keystore::new(dir.path(), ScryptCost::Light);
        let err = keystore
            .load(&keystore.path_for(&test_key().address()), "pw", None)
            .unwrap_err();
        assert!(matches!(
            err,
            WalletError::Keystore(KeystoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_accounts_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        let keystore = Keystore::new(dir.path().join("missing"), ScryptCost::Light);
        assert!(keystore.accounts().unwrap().is_empty());
    }
}
