//! Step validation for the case creation wizard.
//!
//! Step 1 collects the case details, step 2 the initial report. A step may
//! only be left once it has no problems.

use crate::features::cases::dtos::{CaseDraftDto, WizardStepResultDto};
use crate::modules::store::InMemoryStore;
use crate::shared::i18n::{t, Locale};

pub const STEP_DETAILS: u8 = 1;
pub const STEP_REPORT: u8 = 2;

fn details_problems(draft: &CaseDraftDto, store: &InMemoryStore, locale: Locale) -> Vec<String> {
    let mut problems = Vec::new();

    let missing_field = draft.customer_id.is_none()
        || draft
            .location_id
            .as_deref()
            .map_or(true, |id| id.trim().is_empty())
        || draft.title.trim().is_empty()
        || draft.description.trim().is_empty();
    if missing_field {
        problems.push(t(locale, "wizard.fill_required").to_string());
    }

    if let Some(customer_id) = draft.customer_id {
        match store.customer(customer_id) {
            None => problems.push(format!("Customer {} does not exist", customer_id)),
            Some(customer) => {
                if let Some(location_id) = draft.location_id.as_deref() {
                    if store.location(location_id).is_none() {
                        problems.push(format!("Location '{}' does not exist", location_id));
                    } else if !customer.owns_location(location_id) {
                        problems.push(format!(
                            "Location '{}' does not belong to {}",
                            location_id, customer.name
                        ));
                    }
                }
            }
        }
    }

    problems
}

fn report_problems(draft: &CaseDraftDto, locale: Locale) -> Vec<String> {
    let mut problems = Vec::new();

    for risk in &draft.risks {
        if risk.title.trim().is_empty() {
            problems.push(t(locale, "wizard.fill_required").to_string());
        }
        let has_recommendation = risk
            .recommendations
            .iter()
            .any(|r| !r.description.trim().is_empty());
        if !has_recommendation {
            problems.push(format!(
                "{}: {}",
                t(locale, "wizard.risk_needs_recommendation"),
                risk.title
            ));
        }
    }

    problems
}

/// Validate one step of the draft and report where the wizard goes next
pub fn validate_step(
    step: u8,
    draft: &CaseDraftDto,
    store: &InMemoryStore,
    locale: Locale,
) -> WizardStepResultDto {
    let (problems, next) = match step {
        STEP_DETAILS => (details_problems(draft, store, locale), Some(STEP_REPORT)),
        STEP_REPORT => (report_problems(draft, locale), None),
        other => (vec![format!("Unknown wizard step {}", other)], None),
    };

    let valid = problems.is_empty();
    WizardStepResultDto {
        step,
        valid,
        // Stay on the current step until it is valid
        next_step: if valid { next } else { Some(step) },
        problems,
    }
}

/// Problems of every step, in step order
pub fn validate_all(draft: &CaseDraftDto, store: &InMemoryStore, locale: Locale) -> Vec<String> {
    let mut problems = details_problems(draft, store, locale);
    problems.extend(report_problems(draft, locale));
    problems
}
