// Cipher executor
// In-place byte-shift cipher over the file named by a task token
use std::fs;
use tracing::debug;

use workpool_core::domain::{CipherAction, FileTask};
use workpool_core::port::{ExecutionError, TaskExecutor};

/// Default shift applied to every byte
pub const DEFAULT_CIPHER_KEY: u8 = 3;

/// Shift-cipher executor
///
/// Tokens have the `FileTask` form `<path>,ENCRYPT|DECRYPT`. Encryption
/// adds `key` to every byte modulo 256, decryption subtracts it, so the
/// two are exact inverses for the same key.
pub struct CipherExecutor {
    key: u8,
}

impl CipherExecutor {
    pub fn new(key: u8) -> Self {
        Self { key }
    }

    fn apply(&self, action: CipherAction, data: &mut [u8]) {
        match action {
            CipherAction::Encrypt => data.iter_mut().for_each(|b| *b = b.wrapping_add(self.key)),
            CipherAction::Decrypt => data.iter_mut().for_each(|b| *b = b.wrapping_sub(self.key)),
        }
    }
}

impl Default for CipherExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_CIPHER_KEY)
    }
}

impl TaskExecutor for CipherExecutor {
    fn execute(&self, token: &str) -> Result<(), ExecutionError> {
        let task: FileTask = token.parse()?;

        let mut data = fs::read(&task.path)?;
        self.apply(task.action, &mut data);
        fs::write(&task.path, &data)?;

        debug!(
            path = %task.path.display(),
            action = %task.action,
            bytes = data.len(),
            "File processed"
        );
        Ok(())
    }
}
