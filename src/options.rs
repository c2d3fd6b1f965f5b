use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::postings::BLOCK_LIMIT_BYTES;

#[derive(Debug, Error)]
pub enum OptionError {
    #[error("failed to parse options: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid options: {0}")]
    Invalid(#[from] ValidationErrors),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct BlockOption {
    /// Blocks stay strictly below this many bytes. The floor leaves room for one full group.
    #[serde(default = "BlockOption::default_limit_bytes")]
    #[validate(range(min = 18, max = 4096))]
    pub limit_bytes: usize,
}

impl BlockOption {
    fn default_limit_bytes() -> usize {
        BLOCK_LIMIT_BYTES
    }

    /// Parses options from a TOML string, missing keys take their defaults.
    pub fn from_toml(s: &str) -> Result<Self, OptionError> {
        let option: Self = toml::from_str(s)?;
        option.validate()?;
        Ok(option)
    }
}

impl Default for BlockOption {
    fn default() -> Self {
        Self {
            limit_bytes: Self::default_limit_bytes(),
        }
    }
}
