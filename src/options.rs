use serde::Deserialize;

use crate::format::{DEFAULT_LANG, Locale};

/// Options for building a track result.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackOptions {
    /// Site language used to pick number conventions (default: "en")
    #[serde(default = "default_lang")]
    pub lang: String,

    /// Decimal separator overriding the language's convention (default: none)
    #[serde(default)]
    pub decimal_separator: Option<char>,
}

impl Default for TrackOptions {
    fn default() -> Self {
        Self {
            lang: default_lang(),
            decimal_separator: None,
        }
    }
}

impl TrackOptions {
    pub fn locale(&self) -> Locale {
        let locale = Locale::for_lang(&self.lang);
        match self.decimal_separator {
            Some(separator) => locale.with_decimal_separator(separator),
            None => locale,
        }
    }
}

fn default_lang() -> String {
    DEFAULT_LANG.to_string()
}
