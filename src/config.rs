use crate::error::{BadEnvVarSnafu, RollbookResult};
use dotenvy::var;
use snafu::ResultExt;

/// Immutable process-wide configuration, read from the environment once at
/// startup.
#[derive(Clone, Debug)]
pub struct RuntimeConfiguration {
    address: String,
    storage_path: String,
    env: String,
}

impl RuntimeConfiguration {
    pub fn new() -> RollbookResult<Self> {
        let storage_path = var("ROLLBOOK_STORAGE_PATH").context(BadEnvVarSnafu {
            name: "ROLLBOOK_STORAGE_PATH",
        })?;
        let address =
            var("ROLLBOOK_SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let env = var("ROLLBOOK_ENV").unwrap_or_else(|_| "production".to_string());

        Ok(Self {
            address,
            storage_path,
            env,
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn storage_path(&self) -> &str {
        &self.storage_path
    }

    pub fn env(&self) -> &str {
        &self.env
    }
}

#[cfg(test)]
impl RuntimeConfiguration {
    pub(crate) fn for_tests() -> Self {
        Self {
            address: "127.0.0.1:0".to_string(),
            storage_path: "sqlite::memory:".to_string(),
            env: "test".to_string(),
        }
    }
}
