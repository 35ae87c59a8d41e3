//! Request locale.

use serde::{Deserialize, Serialize};

/// Locale a request is served in. Carried explicitly through handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ar,
}

impl Locale {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ar => "ar",
        }
    }

    /// Pick the locale from an `Accept-Language` value.
    ///
    /// Tags are tried in order of appearance (quality values are ignored);
    /// the primary subtag is matched case-insensitively. Falls back to
    /// [`Locale::En`].
    pub fn from_accept_language(header: &str) -> Self {
        header
            .split(',')
            .filter_map(|tag| {
                let tag = tag.split(';').next()?.trim();
                let primary = tag.split('-').next()?;
                match primary.to_ascii_lowercase().as_str() {
                    "en" => Some(Self::En),
                    "ar" => Some(Self::Ar),
                    _ => None,
                }
            })
            .next()
            .unwrap_or_default()
    }
}
