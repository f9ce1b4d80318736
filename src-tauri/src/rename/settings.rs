use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Digit widths offered by the padding selector
pub const ZERO_PAD_RANGE: std::ops::RangeInclusive<usize> = 1..=3;

/// Numbering applied when the archive is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameSettings {
    pub start_number: u32,
    pub zero_pad: usize,
}

impl Default for RenameSettings {
    fn default() -> Self {
        Self {
            start_number: 1,
            zero_pad: 2,
        }
    }
}

impl RenameSettings {
    pub fn new(start_number: u32, zero_pad: usize) -> Result<Self> {
        let settings = Self {
            start_number,
            zero_pad,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if !ZERO_PAD_RANGE.contains(&self.zero_pad) {
            return Err(AppError::InvalidSettings(format!(
                "padding width must be between {} and {}, got {}",
                ZERO_PAD_RANGE.start(),
                ZERO_PAD_RANGE.end(),
                self.zero_pad
            )));
        }
        Ok(())
    }
}
