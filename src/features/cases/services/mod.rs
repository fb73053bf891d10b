mod case_service;
pub mod case_wizard;

pub use case_service::CaseService;
