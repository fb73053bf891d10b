use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Location identifiers
    /// - Valid: "loc-1", "loc-42"
    /// - Invalid: "loc-", "LOC-1", "location-1", "loc-1a"
    pub static ref LOCATION_ID_REGEX: Regex = Regex::new(r"^loc-[0-9]+$").unwrap();

    /// MIME types reported for attachments
    /// - Valid: "application/pdf", "image/svg+xml", "application/vnd.ms-excel"
    /// - Invalid: "pdf", "image/", "/png", "Image/PNG"
    pub static ref MIME_TYPE_REGEX: Regex =
        Regex::new(r"^[a-z]+/[a-z0-9][a-z0-9.+-]*$").unwrap();
}

/// Rejects strings that are empty once trimmed
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("must not be blank".into());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_id_regex() {
        assert!(LOCATION_ID_REGEX.is_match("loc-1"));
        assert!(LOCATION_ID_REGEX.is_match("loc-42"));
        assert!(!LOCATION_ID_REGEX.is_match("loc-"));
        assert!(!LOCATION_ID_REGEX.is_match("LOC-1"));
        assert!(!LOCATION_ID_REGEX.is_match("loc-1a"));
        assert!(!LOCATION_ID_REGEX.is_match(""));
    }

    #[test]
    fn test_mime_type_regex() {
        assert!(MIME_TYPE_REGEX.is_match("application/pdf"));
        assert!(MIME_TYPE_REGEX.is_match("image/svg+xml"));
        assert!(MIME_TYPE_REGEX.is_match("application/vnd.ms-excel"));
        assert!(!MIME_TYPE_REGEX.is_match("pdf"));
        assert!(!MIME_TYPE_REGEX.is_match("image/"));
        assert!(!MIME_TYPE_REGEX.is_match("Image/PNG"));
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("x").is_ok());
        assert!(not_blank("   ").is_err());
        assert!(not_blank("").is_err());
    }
}
