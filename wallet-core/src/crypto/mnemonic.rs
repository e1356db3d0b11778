// wallet-core/src/crypto/mnemonic.rs
//
// Mnemonic Module - BIP-39 phrase generation, restore and seed stretching
// Chuẩn: BIP-39 (Mnemonic), PBKDF2-HMAC-SHA512 / 2048 rounds (Seed Derivation)

use crate::error::{MnemonicError, WalletError, WalletResult};
use bip39::Mnemonic;
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Supported phrase lengths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordCount {
    /// 12 words (128-bit entropy)
    Twelve = 12,
    /// 15 words (160-bit entropy)
    Fifteen = 15,
    /// 18 words (192-bit entropy)
    Eighteen = 18,
    /// 21 words (224-bit entropy)
    TwentyOne = 21,
    /// 24 words (256-bit entropy)
    TwentyFour = 24,
}

impl WordCount {
    /// Entropy bytes backing this many words
    #[inline]
    pub const fn entropy_bytes(self) -> usize {
        match self {
            WordCount::Twelve => 16,
            WordCount::Fifteen => 20,
            WordCount::Eighteen => 24,
            WordCount::TwentyOne => 28,
            WordCount::TwentyFour => 32,
        }
    }
}

/// Wallet Mnemonic - BIP-39 phrase, the root secret of a wallet
///
/// # Security Architecture
/// - **ZeroizeOnDrop**: phrase and entropy are overwritten when the value is dropped
/// - **CSPRNG only**: entropy comes from `OsRng`; if the OS source fails, generation fails
/// - **No Debug Leak**: custom Debug never prints the words
///
/// The phrase is never written to disk by this crate. It is handed back to the
/// caller exactly once, when a wallet is created.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct WalletMnemonic {
    phrase: String,
    entropy: Vec<u8>,
}

impl std::fmt::Debug for WalletMnemonic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletMnemonic")
            .field("word_count", &self.word_count())
            .field("phrase", &"[REDACTED]")
            .finish()
    }
}

impl WalletMnemonic {
    // =========================================================================
    // CONSTRUCTORS
    // =========================================================================

    /// Generate a fresh 12-word mnemonic (128-bit entropy)
    ///
    /// Fails with [`MnemonicError::Entropy`] when the OS randomness source cannot
    /// supply the bytes. There is no fallback to a weaker generator.
    pub fn generate() -> WalletResult<Self> {
        Self::with_word_count(WordCount::Twelve)
    }

    /// Generate a mnemonic with a custom word count
    pub fn with_word_count(word_count: WordCount) -> WalletResult<Self> {
        let entropy_size = word_count.entropy_bytes();

        // Stack-allocated entropy buffer (max 32 bytes)
        let mut entropy = Zeroizing::new([0u8; 32]);
        OsRng
            .try_fill_bytes(&mut entropy[..entropy_size])
            .map_err(|e| WalletError::Mnemonic(MnemonicError::Entropy(e.to_string())))?;

        Self::from_entropy(&entropy[..entropy_size])
    }

    /// Encode raw entropy as a phrase
    ///
    /// Entropy must be 128..=256 bits and a multiple of 32 bits. The checksum is
    /// the top `ENT / 32` bits of SHA-256(entropy).
    pub fn from_entropy(entropy: &[u8]) -> WalletResult<Self> {
        let bits = entropy.len() * 8;
        if bits % 32 != 0 || !(128..=256).contains(&bits) {
            return Err(WalletError::Mnemonic(MnemonicError::InvalidEntropyLength(
                bits,
            )));
        }

        let mnemonic = Mnemonic::from_entropy(entropy).map_err(map_bip39_error)?;

        Ok(Self {
            phrase: mnemonic.to_string(),
            entropy: entropy.to_vec(),
        })
    }

    /// Restore a mnemonic from an existing phrase
    ///
    /// # Validation
    /// - word count (12, 15, 18, 21, 24)
    /// - every word is in the BIP-39 English wordlist
    /// - checksum
    pub fn from_phrase(phrase: &str) -> WalletResult<Self> {
        // Normalize whitespace và count words
        let normalized = phrase.split_whitespace().collect::<Vec<_>>();
        let count = normalized.len();

        if !matches!(count, 12 | 15 | 18 | 21 | 24) {
            return Err(WalletError::Mnemonic(MnemonicError::InvalidWordCount(
                count,
            )));
        }

        let normalized_phrase = normalized.join(" ");
        let mnemonic = Mnemonic::parse(&normalized_phrase).map_err(|e| match e {
            bip39::Error::UnknownWord(idx) => WalletError::Mnemonic(MnemonicError::UnknownWord(
                normalized.get(idx).copied().unwrap_or_default().to_string(),
            )),
            other => map_bip39_error(other),
        })?;

        Ok(Self {
            phrase: normalized_phrase,
            entropy: mnemonic.to_entropy(),
        })
    }

    // =========================================================================
    // GETTERS
    // =========================================================================

    /// The space-separated phrase
    ///
    /// # Warning
    /// Show it to the user once. Never log it.
    #[inline]
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    #[inline]
    pub fn word_count(&self) -> usize {
        self.phrase.split_whitespace().count()
    }

    pub fn words(&self) -> Vec<&str> {
        self.phrase.split_whitespace().collect()
    }

    /// Entropy strength in bits
    #[inline]
    pub fn strength_bits(&self) -> usize {
        self.entropy.len() * 8
    }

    /// Checksum bits appended to the entropy (4 bits for a 12-word phrase)
    pub fn checksum(&self) -> u8 {
        let cs_bits = self.strength_bits() / 32;
        let digest = Sha256::digest(&self.entropy);
        digest[0] >> (8 - cs_bits)
    }

    // =========================================================================
    // SEED DERIVATION
    // =========================================================================

    /// Stretch the phrase into a 64-byte seed (PBKDF2-HMAC-SHA512, 2048 rounds)
    ///
    /// `passphrase` is the optional BIP-39 "25th word"; `None` means the empty string.
    /// Losing a non-empty passphrase makes the wallet unrecoverable from the words alone.
    pub fn to_seed(&self, passphrase: Option<&str>) -> WalletResult<Zeroizing<[u8; 64]>> {
        let mnemonic = Mnemonic::parse(&self.phrase).map_err(map_bip39_error)?;
        Ok(Zeroizing::new(mnemonic.to_seed(passphrase.unwrap_or(""))))
    }

    // =========================================================================
    // VALIDATION
    // =========================================================================

    /// Full validation: word count, wordlist, checksum
    #[inline]
    pub fn validate(phrase: &str) -> bool {
        Self::from_phrase(phrase).is_ok()
    }
}

fn map_bip39_error(e: bip39::Error) -> WalletError {
    let err = match e {
        bip39::Error::BadWordCount(n) => MnemonicError::InvalidWordCount(n),
        bip39::Error::BadEntropyBitCount(bits) => MnemonicError::InvalidEntropyLength(bits),
        bip39::Error::InvalidChecksum => MnemonicError::ChecksumFailed,
        other => MnemonicError::Bip39Error(other.to_string()),
    };
    WalletError::Mnemonic(err)
}

// =============================================================================
// UNIT TESTS
// =============================================================================
