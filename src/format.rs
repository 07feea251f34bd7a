use chrono::TimeDelta;

use crate::stats::TrackStats;

/// Languages that write decimals with a comma.
const DECIMAL_COMMA_LANGS: &[&str] = &[
    "bg", "ca", "cs", "da", "de", "el", "es", "et", "eu", "fi", "fr", "gl", "hr", "hu", "id",
    "it", "lt", "lv", "nb", "nl", "nn", "no", "pl", "pt", "ro", "ru", "sk", "sl", "sv", "tr",
    "uk",
];

pub const DEFAULT_LANG: &str = "en";

/// Number conventions for one site language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    pub lang: String,
    pub decimal_separator: char,
}

impl Default for Locale {
    fn default() -> Self {
        Self::for_lang(DEFAULT_LANG)
    }
}

impl Locale {
    /// Resolve a language code such as `de` or `de-AT`.
    /// Unknown languages fall back to the default `.` separator.
    pub fn for_lang(lang: &str) -> Self {
        let primary = lang
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        let decimal_separator = if DECIMAL_COMMA_LANGS.contains(&primary.as_str()) {
            ','
        } else {
            '.'
        };
        Self {
            lang: primary,
            decimal_separator,
        }
    }

    pub fn with_decimal_separator(mut self, separator: char) -> Self {
        self.decimal_separator = separator;
        self
    }

    /// Kilometers with two decimals, rounded half-up, no grouping.
    pub fn format_distance(&self, km: f64) -> String {
        let hundredths = (km.max(0.0) * 100.0).round() as u64;
        format!(
            "{}{}{:02}",
            hundredths / 100,
            self.decimal_separator,
            hundredths % 100
        )
    }

    /// Elapsed time as `H:MM:SS`, whole seconds.
    pub fn format_duration(&self, span: TimeDelta) -> String {
        let secs = span.num_seconds().max(0);
        format!("{}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60)
    }

    /// `(kilometers, hours)` display strings; both empty without statistics.
    pub fn format_stats(&self, stats: Option<&TrackStats>) -> (String, String) {
        match stats {
            Some(stats) => (
                self.format_distance(stats.distance_km),
                self.format_duration(stats.duration),
            ),
            None => (String::new(), String::new()),
        }
    }
}
