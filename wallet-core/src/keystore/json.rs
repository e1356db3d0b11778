// wallet-core/src/keystore/json.rs
//
// Web3 Secret Storage v3 - encrypted key document
//
// {
//   "address": "<40 hex>",
//   "crypto": {
//     "cipher": "aes-128-ctr",
//     "ciphertext": "...", "cipherparams": { "iv": "..." },
//     "kdf": "scrypt", "kdfparams": { "dklen": 32, "n": .., "p": .., "r": .., "salt": ".." },
//     "mac": "keccak256(dk[16..32] || ciphertext)"
//   },
//   "id": "<uuid v4>",
//   "version": 3
// }

use crate::chains::evm::{keccak256, EvmAddress, KeyMaterial};
use crate::config::ScryptCost;
use crate::error::{AuthFailure, KeystoreError, WalletError, WalletResult};
use aes::cipher::{KeyIvInit, StreamCipher};
use alloy::primitives::Address;
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use uuid::Uuid;
use zeroize::Zeroizing;

type Aes128Ctr = ctr::Ctr128BE<aes::Aes128>;

pub const KEYSTORE_VERSION: u32 = 3;
pub const CIPHER_AES_128_CTR: &str = "aes-128-ctr";
const PBKDF2_PRF: &str = "hmac-sha256";
const SALT_LEN: usize = 32;
const IV_LEN: usize = 16;

// =============================================================================
// DOCUMENT
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedKeyFile {
    /// Lowercase hex, no `0x`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(alias = "Crypto")]
    pub crypto: CryptoJson,
    pub id: Uuid,
    pub version: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoJson {
    pub cipher: String,
    #[serde(with = "hex_bytes")]
    pub ciphertext: Vec<u8>,
    pub cipherparams: CipherParams,
    pub kdf: KdfKind,
    pub kdfparams: KdfParams,
    #[serde(with = "hex_bytes")]
    pub mac: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherParams {
    #[serde(with = "hex_bytes")]
    pub iv: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KdfKind {
    Scrypt,
    Pbkdf2,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KdfParams {
    Scrypt {
        dklen: usize,
        n: u32,
        p: u32,
        r: u32,
        #[serde(with = "hex_bytes")]
        salt: Vec<u8>,
    },
    Pbkdf2 {
        c: u32,
        dklen: usize,
        prf: String,
        #[serde(with = "hex_bytes")]
        salt: Vec<u8>,
    },
}

impl EncryptedKeyFile {
    pub fn from_json(bytes: &[u8]) -> WalletResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| {
            WalletError::Keystore(KeystoreError::Format(format!("invalid keystore JSON: {}", e)))
        })
    }

    pub fn to_json(&self) -> WalletResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| {
            WalletError::Keystore(KeystoreError::Format(format!(
                "keystore serialization failed: {}",
                e
            )))
        })
    }

    /// Address recorded in the document, if any
    pub fn recorded_address(&self) -> WalletResult<Option<Address>> {
        match &self.address {
            None => Ok(None),
            Some(raw) => EvmAddress::parse(raw).map(Some).map_err(|_| {
                WalletError::Keystore(KeystoreError::Format(format!(
                    "invalid address field: {}",
                    raw
                )))
            }),
        }
    }
}

// =============================================================================
// ENCRYPT
// =============================================================================

/// Encrypt `key` under `password` with a fresh salt, IV and id
pub fn encrypt_key(
    key: &KeyMaterial,
    password: &str,
    cost: ScryptCost,
) -> WalletResult<EncryptedKeyFile> {
    let mut salt = vec![0u8; SALT_LEN];
    let mut iv = vec![0u8; IV_LEN];
    fill_random(&mut salt)?;
    fill_random(&mut iv)?;

    let kdfparams = KdfParams::Scrypt {
        dklen: ScryptCost::DKLEN,
        n: cost.n(),
        p: cost.p(),
        r: cost.r(),
        salt,
    };
    encrypt_with(key, password, kdfparams, iv, Uuid::new_v4())
}

/// Deterministic core of [`encrypt_key`]
pub(crate) fn encrypt_with(
    key: &KeyMaterial,
    password: &str,
    kdfparams: KdfParams,
    iv: Vec<u8>,
    id: Uuid,
) -> WalletResult<EncryptedKeyFile> {
    let derived = derive_key(password.as_bytes(), &kdfparams)?;

    let mut ciphertext = key.private_key_bytes().to_vec();
    apply_aes_ctr(&derived[..16], &iv, &mut ciphertext)?;
    let mac = compute_mac(&derived[16..32], &ciphertext);

    let kdf = match kdfparams {
        KdfParams::Scrypt { .. } => KdfKind::Scrypt,
        KdfParams::Pbkdf2 { .. } => KdfKind::Pbkdf2,
    };

    Ok(EncryptedKeyFile {
        address: Some(hex::encode(key.address())),
        crypto: CryptoJson {
            cipher: CIPHER_AES_128_CTR.to_string(),
            ciphertext,
            cipherparams: CipherParams { iv },
            kdf,
            kdfparams,
            mac: mac.to_vec(),
        },
        id,
        version: KEYSTORE_VERSION,
    })
}

// =============================================================================
// DECRYPT
// =============================================================================

/// Verify the MAC, decrypt and check the key against the recorded address
///
/// Nothing is returned unless every check passes.
pub fn decrypt_key(file: &EncryptedKeyFile, password: &str) -> WalletResult<KeyMaterial> {
    if file.version != KEYSTORE_VERSION {
        return Err(WalletError::Keystore(KeystoreError::Unsupported(format!(
            "keystore version {}",
            file.version
        ))));
    }
    let crypto = &file.crypto;
    if crypto.cipher != CIPHER_AES_128_CTR {
        return Err(WalletError::Keystore(KeystoreError::Unsupported(format!(
            "cipher {}",
            crypto.cipher
        ))));
    }
    let params_kind = match crypto.kdfparams {
        KdfParams::Scrypt { .. } => KdfKind::Scrypt,
        KdfParams::Pbkdf2 { .. } => KdfKind::Pbkdf2,
    };
    if params_kind != crypto.kdf {
        return Err(WalletError::Keystore(KeystoreError::Format(
            "kdfparams do not match kdf".to_string(),
        )));
    }
    let recorded = file.recorded_address()?;

    let derived = derive_key(password.as_bytes(), &crypto.kdfparams)?;

    let expected_mac = compute_mac(&derived[16..32], &crypto.ciphertext);
    if !constant_time_eq(&expected_mac, &crypto.mac) {
        tracing::warn!(id = %file.id, "keystore integrity check failed");
        return Err(WalletError::Keystore(KeystoreError::Authentication(
            AuthFailure::MacMismatch,
        )));
    }

    let mut plaintext = Zeroizing::new(crypto.ciphertext.clone());
    apply_aes_ctr(&derived[..16], &crypto.cipherparams.iv, &mut plaintext)?;

    let key = KeyMaterial::from_slice(&plaintext).map_err(|_| {
        WalletError::Keystore(KeystoreError::Format(
            "decrypted data is not a valid private key".to_string(),
        ))
    })?;

    if let Some(recorded) = recorded {
        if recorded != key.address() {
            tracing::warn!(recorded = %recorded, derived = %key.address(), "keystore address check failed");
            return Err(WalletError::Keystore(KeystoreError::Authentication(
                AuthFailure::AddressMismatch {
                    expected: recorded.to_checksum(None),
                    found: key.address().to_checksum(None),
                },
            )));
        }
    }

    Ok(key)
}

// =============================================================================
// PRIMITIVES
// =============================================================================

fn derive_key(password: &[u8], params: &KdfParams) -> WalletResult<Zeroizing<Vec<u8>>> {
    match params {
        KdfParams::Scrypt {
            dklen,
            n,
            p,
            r,
            salt,
        } => {
            check_dklen(*dklen)?;
            if *n < 2 || !n.is_power_of_two() {
                return Err(WalletError::Keystore(KeystoreError::Format(format!(
                    "scrypt n must be a power of two, got {}",
                    n
                ))));
            }
            let log_n = n.trailing_zeros() as u8;
            tracing::debug!(kdf = "scrypt", n = *n, r = *r, p = *p, "deriving keystore key");

            let params = scrypt::Params::new(log_n, *r, *p, *dklen).map_err(|e| {
                WalletError::Keystore(KeystoreError::Unsupported(format!(
                    "scrypt parameters n={} r={} p={}: {}",
                    n, r, p, e
                )))
            })?;
            let mut out = Zeroizing::new(vec![0u8; *dklen]);
            scrypt::scrypt(password, salt, &params, &mut out).map_err(|e| {
                WalletError::Keystore(KeystoreError::Format(format!("scrypt failed: {}", e)))
            })?;
            Ok(out)
        }
        KdfParams::Pbkdf2 {
            c,
            dklen,
            prf,
            salt,
        } => {
            check_dklen(*dklen)?;
            if prf != PBKDF2_PRF {
                return Err(WalletError::Keystore(KeystoreError::Unsupported(format!(
                    "pbkdf2 prf {}",
                    prf
                ))));
            }
            tracing::debug!(kdf = "pbkdf2", c = *c, "deriving keystore key");

            let mut out = Zeroizing::new(vec![0u8; *dklen]);
            pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, *c, &mut out);
            Ok(out)
        }
    }
}

fn check_dklen(dklen: usize) -> WalletResult<()> {
    if !(32..=64).contains(&dklen) {
        return Err(WalletError::Keystore(KeystoreError::Format(format!(
            "dklen must be 32..=64, got {}",
            dklen
        ))));
    }
    Ok(())
}

fn apply_aes_ctr(key: &[u8], iv: &[u8], buf: &mut [u8]) -> WalletResult<()> {
    let mut cipher = Aes128Ctr::new_from_slices(key, iv).map_err(|_| {
        WalletError::Keystore(KeystoreError::Format(format!(
            "invalid cipher IV length {}",
            iv.len()
        )))
    })?;
    cipher.apply_keystream(buf);
    Ok(())
}

fn compute_mac(mac_key: &[u8], ciphertext: &[u8]) -> [u8; 32] {
    let mut input = Zeroizing::new(Vec::with_capacity(mac_key.len() + ciphertext.len()));
    input.extend_from_slice(mac_key);
    input.extend_from_slice(ciphertext);
    keccak256(&input)
}

fn fill_random(buf: &mut [u8]) -> WalletResult<()> {
    OsRng.try_fill_bytes(buf).map_err(|e| {
        WalletError::Keystore(KeystoreError::Io(format!("system randomness unavailable: {}", e)))
    })
}

/// Constant-time byte comparison
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        let digits = s.strip_prefix("0x").unwrap_or(&s);
        hex::decode(digits).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_PRIVATE_KEY: &str =
        "7a28b5ba57c53603b0b07b56bba752f7784bf506fa95edc395f5cf6c7514fe9d";

    // Web3 Secret Storage test vector (PBKDF2-SHA-256)
    const PBKDF2_VECTOR: &str = r#"{
        "crypto" : {
            "cipher" : "aes-128-ctr",
            "cipherparams" : { "iv" : "6087dab2f9fdbbfaddc31a909735c1e6" },
            "ciphertext" : "5318b4d5bcd28de64ee5559e671353e16f075ecae9f99c7a79a38af5f869aa46",
            "kdf" : "pbkdf2",
            "kdfparams" : {
                "c" : 262144,
                "dklen" : 32,
                "prf" : "hmac-sha256",
                "salt" : "ae3cd4e7013836a3df6bd7241b12db061dbe2c6785853cce422d148a624ce0bd"
            },
            "mac" : "517ead924a9d0dc3124507e3393d175ce3ff7c1e96529c6c555ce9e51205e9b2"
        },
        "id" : "3198bc9c-6672-5ab3-d995-4942343ae5b6",
        "version" : 3
    }"#;

    // Fixed scrypt keystore (n=8192, r=8, p=1) over the same private key
    const SCRYPT_VECTOR: &str = r#"{
        "address" : "008aeeda4d805471df9b2a5b0f38a0c3bcba786b",
        "crypto" : {
            "cipher" : "aes-128-ctr",
            "cipherparams" : { "iv" : "0f1e2d3c4b5a69788796a5b4c3d2e1f0" },
            "ciphertext" : "57f1e1995fe5fa1537604abcfa153266fb1a1847c042c8bedf1db0b705ba669b",
            "kdf" : "scrypt",
            "kdfparams" : {
                "dklen" : 32,
                "n" : 8192,
                "p" : 1,
                "r" : 8,
                "salt" : "5e2c3ab9bb4fa03ef2c8e5ad4b9c5b3c6d1a8f0e7b2d4c6a9e1f3b5d7c9a0e2f"
            },
            "mac" : "81d00dd2281532ff91a73814a25ffd4eb31f2d2252f97b5443c2fec4d31a1fbf"
        },
        "id" : "3198bc9c-6672-5ab3-d995-4942343ae5b6",
        "version" : 3
    }"#;

    fn test_key() -> KeyMaterial {
        KeyMaterial::from_slice(&hex::decode(TEST_PRIVATE_KEY).unwrap()).unwrap()
    }

    #[test]
    fn test_pbkdf2_vector() {
        let file = EncryptedKeyFile::from_json(PBKDF2_VECTOR.as_bytes()).unwrap();
        assert_eq!(file.crypto.kdf, KdfKind::Pbkdf2);
        assert!(file.address.is_none());

        let key = decrypt_key(&file, "testpassword").unwrap();
        assert_eq!(hex::encode(&key.private_key_bytes()[..]), TEST_PRIVATE_KEY);
        assert_eq!(
            hex::encode(key.address()),
            "008aeeda4d805471df9b2a5b0f38a0c3bcba786b"
        );
    }

    #[test]
    fn test_pbkdf2_vector_reencrypts_identically() {
        let vector = EncryptedKeyFile::from_json(PBKDF2_VECTOR.as_bytes()).unwrap();
        let rebuilt = encrypt_with(
            &test_key(),
            "testpassword",
            vector.crypto.kdfparams.clone(),
            vector.crypto.cipherparams.iv.clone(),
            vector.id,
        )
        .unwrap();
        assert_eq!(rebuilt.crypto.ciphertext, vector.crypto.ciphertext);
        assert_eq!(rebuilt.crypto.mac, vector.crypto.mac);
    }

    #[test]
    fn test_scrypt_vector() {
        let file = EncryptedKeyFile::from_json(SCRYPT_VECTOR.as_bytes()).unwrap();
        assert_eq!(file.crypto.kdf, KdfKind::Scrypt);

        let key = decrypt_key(&file, "geth-style").unwrap();
        assert_eq!(hex::encode(&key.private_key_bytes()[..]), TEST_PRIVATE_KEY);

        assert!(matches!(
            decrypt_key(&file, "geth-styl"),
            Err(WalletError::Keystore(KeystoreError::Authentication(
                AuthFailure::MacMismatch
            )))
        ));
    }

    #[test]
    fn test_scrypt_vector_reencrypts_identically() {
        let vector = EncryptedKeyFile::from_json(SCRYPT_VECTOR.as_bytes()).unwrap();
        let rebuilt = encrypt_with(
            &test_key(),
            "geth-style",
            vector.crypto.kdfparams.clone(),
            vector.crypto.cipherparams.iv.clone(),
            vector.id,
        )
        .unwrap();
        assert_eq!(rebuilt, vector);
    }

    // r=1 with n=2^18 is outside what RFC 7914 scrypt accepts (log n < 16 r)
    #[test]
    fn test_scrypt_r1_is_unsupported() {
        let mut file = EncryptedKeyFile::from_json(SCRYPT_VECTOR.as_bytes()).unwrap();
        file.crypto.kdfparams = KdfParams::Scrypt {
            dklen: 32,
            n: 262_144,
            p: 8,
            r: 1,
            salt: hex::decode("ab0c7876052600dd703518d6fc3fe8984592145b591fc8fb5c6d43190334ba19")
                .unwrap(),
        };
        match decrypt_key(&file, "testpassword") {
            Err(WalletError::Keystore(KeystoreError::Unsupported(msg))) => {
                assert!(msg.starts_with("scrypt parameters n=262144 r=1 p=8"), "{}", msg);
            }
            other => panic!("expected Unsupported, got {:?}", other.map(|k| k.address())),
        }
    }

    #[test]
    fn test_scrypt_round_trip() {
        let key = test_key();
        let file = encrypt_key(&key, "pw1", ScryptCost::Light).unwrap();
        assert_eq!(file.version, 3);
        assert_eq!(file.crypto.kdf, KdfKind::Scrypt);
        assert_eq!(file.id.get_version_num(), 4);
        assert_eq!(
            file.address.as_deref(),
            Some("008aeeda4d805471df9b2a5b0f38a0c3bcba786b")
        );

        let json = file.to_json().unwrap();
        let parsed = EncryptedKeyFile::from_json(&json).unwrap();
        let restored = decrypt_key(&parsed, "pw1").unwrap();
        assert!(restored.same_key(&key));
    }

    #[test]
    fn test_field_layout() {
        let file = encrypt_key(&test_key(), "pw", ScryptCost::Light).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&file.to_json().unwrap()).unwrap();
        assert_eq!(value["crypto"]["cipher"], "aes-128-ctr");
        assert_eq!(value["crypto"]["kdf"], "scrypt");
        assert_eq!(value["crypto"]["kdfparams"]["n"], 4096);
        assert_eq!(value["crypto"]["kdfparams"]["r"], 8);
        assert_eq!(value["crypto"]["kdfparams"]["p"], 6);
        assert_eq!(value["crypto"]["kdfparams"]["dklen"], 32);
        assert_eq!(value["crypto"]["cipherparams"]["iv"].as_str().unwrap().len(), 32);
        assert_eq!(value["crypto"]["kdfparams"]["salt"].as_str().unwrap().len(), 64);
        assert_eq!(value["version"], 3);
    }

    #[test]
    fn test_fresh_salt_and_iv() {
        let key = test_key();
        let a = encrypt_key(&key, "pw", ScryptCost::Light).unwrap();
        let b = encrypt_key(&key, "pw", ScryptCost::Light).unwrap();
        assert_ne!(a.crypto.ciphertext, b.crypto.ciphertext);
        assert_ne!(a.crypto.cipherparams.iv, b.crypto.cipherparams.iv);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_wrong_password() {
        let file = encrypt_key(&test_key(), "pw1", ScryptCost::Light).unwrap();
        let result = decrypt_key(&file, "pw2");
        assert_eq!(
            result.unwrap_err(),
            WalletError::Keystore(KeystoreError::Authentication(AuthFailure::MacMismatch))
        );
    }

    #[test]
    fn test_tampered_ciphertext_and_mac() {
        let file = encrypt_key(&test_key(), "pw", ScryptCost::Light).unwrap();

        for i in [0usize, 17, 31] {
            let mut tampered = file.clone();
            tampered.crypto.ciphertext[i] ^= 0x01;
            assert!(decrypt_key(&tampered, "pw").unwrap_err().is_authentication());
        }

        let mut tampered = file.clone();
        tampered.crypto.mac[0] ^= 0x80;
        assert!(decrypt_key(&tampered, "pw").unwrap_err().is_authentication());
    }

    #[test]
    fn test_address_field_mismatch() {
        let mut file = encrypt_key(&test_key(), "pw", ScryptCost::Light).unwrap();
        file.address = Some("f39fd6e51aad88f6f4ce6ab8827279cfffb92266".to_string());
        let result = decrypt_key(&file, "pw");
        assert!(matches!(
            result,
            Err(WalletError::Keystore(KeystoreError::Authentication(
                AuthFailure::AddressMismatch { .. }
            )))
        ));
    }

    #[test]
    fn test_unsupported_version_and_cipher() {
        let file = encrypt_key(&test_key(), "pw", ScryptCost::Light).unwrap();

        let mut v2 = file.clone();
        v2.version = 2;
        assert!(matches!(
            decrypt_key(&v2, "pw"),
            Err(WalletError::Keystore(KeystoreError::Unsupported(_)))
        ));

        let mut cbc = file;
        cbc.crypto.cipher = "aes-128-cbc".to_string();
        assert!(matches!(
            decrypt_key(&cbc, "pw"),
            Err(WalletError::Keystore(KeystoreError::Unsupported(_)))
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            EncryptedKeyFile::from_json(b"{\"version\": 3}"),
            Err(WalletError::Keystore(KeystoreError::Format(_)))
        ));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"ab"));
    }
}
