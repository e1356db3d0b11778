// wallet-core/src/api/secret.rs
//
// Secret input boundary - mật khẩu đến từ đâu không phải việc của core

use crate::error::{WalletError, WalletResult};
use zeroize::Zeroizing;

/// Source of passwords (interactive prompt, CLI flag, test fixture)
pub trait SecretSource {
    /// Read one secret; implementations must not echo it
    fn read_secret(&mut self, prompt: &str) -> WalletResult<Zeroizing<String>>;
}

/// Hidden terminal prompt on stderr
#[derive(Debug, Default)]
pub struct TerminalSecret;

impl SecretSource for TerminalSecret {
    fn read_secret(&mut self, prompt: &str) -> WalletResult<Zeroizing<String>> {
        rpassword::prompt_password_stderr(prompt)
            .map(Zeroizing::new)
            .map_err(|e| WalletError::Validation(format!("failed to read password: {}", e)))
    }
}

/// A secret supplied up front, e.g. from a `-pass` flag
pub struct FixedSecret(Zeroizing<String>);

impl FixedSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(Zeroizing::new(secret.into()))
    }
}

impl std::fmt::Debug for FixedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FixedSecret(<redacted>)")
    }
}

impl SecretSource for FixedSecret {
    fn read_secret(&mut self, _prompt: &str) -> WalletResult<Zeroizing<String>> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_secret() {
        let mut source = FixedSecret::new("hunter2");
        assert_eq!(source.read_secret("Password: ").unwrap().as_str(), "hunter2");
        assert_eq!(source.read_secret("Again: ").unwrap().as_str(), "hunter2");
        assert!(!format!("{:?}", source).contains("hunter2"));
    }
}
