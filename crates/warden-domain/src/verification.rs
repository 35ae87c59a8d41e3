//! Verification-code purposes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What a verification code proves when it is checked.
///
/// Wire format: snake_case string (`"registration"`, `"password_reset"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodePurpose {
    Registration,
    PasswordReset,
}

impl CodePurpose {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Registration => "registration",
            Self::PasswordReset => "password_reset",
        }
    }

    /// Lifetime of a freshly issued code in seconds.
    pub fn ttl_secs(self) -> i64 {
        match self {
            Self::Registration => 10 * 60,
            Self::PasswordReset => 15 * 60,
        }
    }
}

impl fmt::Display for CodePurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown code purpose: {0}")]
pub struct UnknownPurpose(pub String);

impl FromStr for CodePurpose {
    type Err = UnknownPurpose;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "registration" => Ok(Self::Registration),
            "password_reset" => Ok(Self::PasswordReset),
            other => Err(UnknownPurpose(other.to_owned())),
        }
    }
}

/// Number of digits in a verification code.
pub const CODE_LEN: usize = 6;
