pub mod constants;
pub mod i18n;
pub mod templates;
pub mod test_helpers;
pub mod types;
pub mod validation;
