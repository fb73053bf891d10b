//! Localized UI copy.
//!
//! All user-facing strings live in one table keyed by message key, with one
//! column per supported locale. Handlers resolve the request locale through the
//! `RequestLocale` extractor and look strings up with [`t`].

mod messages;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::error::AppError;

pub use messages::t;

/// Supported UI locales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    De,
}

impl Locale {
    /// Parse a language tag such as `de`, `de-AT` or `en_US`
    pub fn from_code(code: &str) -> Option<Self> {
        let primary = code
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        match primary.as_str() {
            "en" => Some(Locale::En),
            "de" => Some(Locale::De),
            _ => None,
        }
    }

    /// Pick the first supported language of an `Accept-Language` header,
    /// honouring q-values.
    pub fn from_accept_language(header: &str) -> Option<Self> {
        let mut candidates: Vec<(f32, Locale)> = header
            .split(',')
            .filter_map(|part| {
                let mut pieces = part.split(';');
                let tag = pieces.next()?;
                let locale = Locale::from_code(tag)?;
                let quality = pieces
                    .find_map(|p| p.trim().strip_prefix("q="))
                    .and_then(|q| q.parse::<f32>().ok())
                    .unwrap_or(1.0);
                Some((quality, locale))
            })
            .filter(|(quality, _)| *quality > 0.0)
            .collect();

        // Stable sort keeps header order for equal weights
        candidates.sort_by(|a, b| b.0.total_cmp(&a.0));
        candidates.first().map(|(_, locale)| *locale)
    }

    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::De => "de",
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Replace the message of errors the end user sees verbatim with localized copy
pub fn localize_error(error: AppError, locale: Locale) -> AppError {
    match error {
        AppError::AccessDenied(_) => AppError::AccessDenied(t(locale, "link.invalid").to_string()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code() {
        assert_eq!(Locale::from_code("de"), Some(Locale::De));
        assert_eq!(Locale::from_code("de-AT"), Some(Locale::De));
        assert_eq!(Locale::from_code("EN_us"), Some(Locale::En));
        assert_eq!(Locale::from_code("fr"), None);
        assert_eq!(Locale::from_code(""), None);
    }

    #[test]
    fn test_accept_language_prefers_quality() {
        assert_eq!(
            Locale::from_accept_language("fr-FR, en;q=0.5, de;q=0.8"),
            Some(Locale::De)
        );
        assert_eq!(
            Locale::from_accept_language("de-AT,de;q=0.9,en;q=0.8"),
            Some(Locale::De)
        );
        assert_eq!(Locale::from_accept_language("fr, es"), None);
        assert_eq!(Locale::from_accept_language("de;q=0, en"), Some(Locale::En));
    }

    #[test]
    fn test_localize_access_denied() {
        let err = localize_error(AppError::AccessDenied("bad signature".into()), Locale::De);
        match err {
            AppError::AccessDenied(msg) => assert!(msg.contains("ungültig")),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
