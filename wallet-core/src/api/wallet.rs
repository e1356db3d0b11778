// wallet-core/src/api/wallet.rs
//
// Wallet Facade
//
// Create: mnemonic → derive key → Unlocked (in memory) → store (atomic, last step)
// Load:   Reference(path) → read password → decrypt + verify → Unlocked
//
// Giải mã thất bại thì ví giữ nguyên trạng thái Reference; core không tự retry.

use crate::api::secret::SecretSource;
use crate::chains::evm::{EvmSigner, KeyMaterial, SignedTransaction, UnsignedTransaction};
use crate::config::WalletConfig;
use crate::crypto::{KeyDeriver, WalletMnemonic};
use crate::error::{KeystoreError, WalletError, WalletResult};
use crate::keystore::{EncryptedKeyFile, Keystore};
use crate::network::{Balance, RpcClient, TokenTransfer, TransferLogQuery};
use alloy::primitives::{Address, Bytes, B256, U256};
use std::path::{Path, PathBuf};

const PASSWORD_PROMPT: &str = "Keystore password: ";

/// Where the wallet's key currently lives
pub enum WalletState {
    /// Only the encrypted file is known
    Reference { path: PathBuf },
    /// Decrypted key in memory; `path` is set once persisted
    Unlocked {
        key: KeyMaterial,
        path: Option<PathBuf>,
    },
}

/// Result of [`Wallet::create`]; the mnemonic is shown once and never stored
#[derive(Debug)]
pub struct CreatedWallet {
    pub wallet: Wallet,
    pub mnemonic: WalletMnemonic,
}

/// A single-account wallet bound to one derivation path and one chain
pub struct Wallet {
    address: Address,
    state: WalletState,
    config: WalletConfig,
    keystore: Keystore,
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .field("unlocked", &self.is_unlocked())
            .field("path", &self.keystore_path())
            .field("chain_id", &self.config.chain.chain_id)
            .finish_non_exhaustive()
    }
}

impl Wallet {
    // =========================================================================
    // CREATE
    // =========================================================================

    /// Generate a fresh mnemonic, derive the account key and persist it
    ///
    /// Nothing is written unless every earlier step succeeded.
    pub fn create(
        config: WalletConfig,
        secrets: &mut dyn SecretSource,
    ) -> WalletResult<CreatedWallet> {
        let mnemonic = WalletMnemonic::generate()?;
        let mut wallet = Self::from_mnemonic(config, &mnemonic, None)?;

        let password = secrets.read_secret(PASSWORD_PROMPT)?;
        wallet.persist(&password)?;

        tracing::info!(address = %wallet.address, "wallet created");
        Ok(CreatedWallet { wallet, mnemonic })
    }

    /// Rebuild the account key from an existing mnemonic (not persisted)
    pub fn from_mnemonic(
        config: WalletConfig,
        mnemonic: &WalletMnemonic,
        passphrase: Option<&str>,
    ) -> WalletResult<Self> {
        let path = config.hd_path()?;
        let key = KeyDeriver::derive_key(mnemonic, passphrase, &path)?;
        Ok(Self::with_key(config, key))
    }

    fn with_key(config: WalletConfig, key: KeyMaterial) -> Self {
        let keystore = Keystore::new(config.data_dir.clone(), config.scrypt);
        Self {
            address: key.address(),
            state: WalletState::Unlocked { key, path: None },
            config,
            keystore,
        }
    }

    /// Encrypt the in-memory key to `<data_dir>/0x<address>`
    pub fn persist(&mut self, password: &str) -> WalletResult<PathBuf> {
        let WalletState::Unlocked { key, path } = &mut self.state else {
            return Err(WalletError::Locked);
        };
        let stored = self.keystore.store(key, password)?;
        *path = Some(stored.clone());

        tracing::info!(address = %self.address, path = %stored.display(), "wallet persisted");
        Ok(stored)
    }

    // =========================================================================
    // LOAD
    // =========================================================================

    /// Reference an existing keystore file without decrypting it
    ///
    /// The expected address comes from the file name (`0x<address>`), or from
    /// the document's `address` field for files named otherwise.
    pub fn open(config: WalletConfig, path: impl AsRef<Path>) -> WalletResult<Self> {
        let path = path.as_ref().to_path_buf();
        let address = match Keystore::address_from_path(&path) {
            Some(address) => {
                if !path.is_file() {
                    return Err(WalletError::Keystore(KeystoreError::NotFound {
                        path: path.display().to_string(),
                    }));
                }
                address
            }
            None => {
                let content = crate::keystore::file::read_key_file(&path)?;
                EncryptedKeyFile::from_json(&content)?
                    .recorded_address()?
                    .ok_or_else(|| {
                        WalletError::Keystore(KeystoreError::Format(
                            "keystore has no address field and no address file name".to_string(),
                        ))
                    })?
            }
        };

        let keystore = Keystore::new(config.data_dir.clone(), config.scrypt);
        Ok(Self {
            address,
            state: WalletState::Reference { path },
            config,
            keystore,
        })
    }

    /// Reference the keystore of `address` inside the configured data dir
    pub fn open_address(config: WalletConfig, address: Address) -> WalletResult<Self> {
        let path = Keystore::new(config.data_dir.clone(), config.scrypt).path_for(&address);
        Self::open(config, path)
    }

    /// Prompt for the password, decrypt and verify
    ///
    /// On failure the wallet stays in `Reference`; the caller may re-prompt.
    pub fn unlock(&mut self, secrets: &mut dyn SecretSource) -> WalletResult<()> {
        let path = match &self.state {
            WalletState::Unlocked { .. } => return Ok(()),
            WalletState::Reference { path } => path.clone(),
        };

        let password = secrets.read_secret(PASSWORD_PROMPT)?;
        let key = self.keystore.load(&path, &password, Some(self.address))?;

        self.state = WalletState::Unlocked {
            key,
            path: Some(path),
        };
        Ok(())
    }

    /// Drop the in-memory key and return to `Reference`
    pub fn lock(&mut self) -> WalletResult<()> {
        let path = match &self.state {
            WalletState::Reference { .. } => return Ok(()),
            WalletState::Unlocked { path: Some(path), .. } => path.clone(),
            WalletState::Unlocked { path: None, .. } => {
                return Err(WalletError::Validation(
                    "wallet has not been persisted; locking would lose the key".to_string(),
                ))
            }
        };
        self.state = WalletState::Reference { path };
        tracing::debug!(address = %self.address, "wallet locked");
        Ok(())
    }

    // =========================================================================
    // GETTERS
    // =========================================================================

    #[inline]
    pub fn address(&self) -> Address {
        self.address
    }

    #[inline]
    pub fn state(&self) -> &WalletState {
        &self.state
    }

    #[inline]
    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    pub fn is_unlocked(&self) -> bool {
        matches!(self.state, WalletState::Unlocked { .. })
    }

    pub fn keystore_path(&self) -> Option<&Path> {
        match &self.state {
            WalletState::Reference { path } => Some(path),
            WalletState::Unlocked { path, .. } => path.as_deref(),
        }
    }

    /// Live key, or [`WalletError::Locked`]
    pub fn key(&self) -> WalletResult<&KeyMaterial> {
        match &self.state {
            WalletState::Unlocked { key, .. } => Ok(key),
            WalletState::Reference { .. } => Err(WalletError::Locked),
        }
    }

    // =========================================================================
    // SIGN
    // =========================================================================

    /// Sign for the configured chain, verifying the signer is this account
    pub fn sign(&self, tx: &UnsignedTransaction) -> WalletResult<SignedTransaction> {
        let key = self.key()?;
        EvmSigner::new(key, self.config.chain.chain_id).sign_transaction_for(self.address, tx)
    }

    // =========================================================================
    // RPC FLOWS
    // =========================================================================

    /// Native transfer: nonce → sign → broadcast
    pub async fn transfer(
        &self,
        rpc: &dyn RpcClient,
        to: Address,
        value: U256,
    ) -> WalletResult<B256> {
        self.key()?;
        let nonce = rpc.get_transaction_count(self.address).await?;
        let tx = UnsignedTransaction {
            nonce,
            to,
            value,
            gas_limit: self.config.chain.gas_limit,
            gas_price: self.config.chain.gas_price,
            data: Bytes::new(),
        };
        let signed = self.sign(&tx)?;

        let hash = rpc.send_raw_transaction(signed.raw()).await?;
        if hash != signed.hash() {
            tracing::warn!(local = %signed.hash(), remote = %hash, "node reported a different transaction hash");
        }

        tracing::info!(
            from = %self.address,
            to = %to,
            nonce,
            chain_id = self.config.chain.chain_id,
            tx_hash = %hash,
            "transfer broadcast"
        );
        Ok(hash)
    }

    /// Native balance of this account
    pub async fn balance(&self, rpc: &dyn RpcClient) -> WalletResult<Balance> {
        let wei = rpc.get_balance(self.address).await?;
        Ok(Balance::from_wei(wei, "ETH"))
    }

    /// ERC-20 transfers of `token` sent or received by this account
    pub async fn token_transfers(
        &self,
        rpc: &dyn RpcClient,
        token: Address,
    ) -> WalletResult<Vec<TokenTransfer>> {
        let query = TransferLogQuery::for_account(token, self.address);
        let mut logs = rpc.filter_logs(&query.outgoing_filter()).await?;
        logs.extend(rpc.filter_logs(&query.incoming_filter()).await?);
        Ok(query.collect(logs))
    }
}

// =============================================================================
// TESTS
// =============================================================================
