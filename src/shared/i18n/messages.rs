use std::collections::HashMap;

use lazy_static::lazy_static;

use super::Locale;

/// (key, english, german)
const MESSAGES: &[(&str, &str, &str)] = &[
    // Cases
    ("case.created", "Case created", "Fall erstellt"),
    ("case.status_updated", "Case status updated", "Fallstatus aktualisiert"),
    ("case.status_unchanged", "Case already has this status", "Der Fall hat diesen Status bereits"),
    ("case.note_added", "Note added", "Notiz hinzugefügt"),
    ("case.attachment_added", "Attachment added", "Anhang hinzugefügt"),
    ("case.attachment_deleted", "Attachment deleted", "Anhang gelöscht"),
    ("status.open", "Open", "Offen"),
    ("status.in_progress", "In Progress", "In Bearbeitung"),
    ("status.closed", "Closed", "Geschlossen"),
    // Wizard
    ("wizard.fill_required", "Please fill in all required fields", "Bitte füllen Sie alle Pflichtfelder aus"),
    (
        "wizard.risk_needs_recommendation",
        "Each risk needs at least one recommendation",
        "Jedes Risiko benötigt mindestens eine Empfehlung",
    ),
    ("wizard.step_valid", "Step complete", "Schritt abgeschlossen"),
    // Reports
    ("report.saved", "Report saved", "Bericht gespeichert"),
    ("report.title_suffix", "Report", "Bericht"),
    (
        "report.risk_deleted",
        "Risk assessment and its recommendations deleted",
        "Risikobewertung und zugehörige Empfehlungen gelöscht",
    ),
    ("report.suggestion_deleted", "Recommendation deleted", "Empfehlung gelöscht"),
    ("report.not_changed", "Nothing to update", "Keine Änderungen"),
    // Customer links and responses
    ("link.generated", "Customer link generated", "Kundenlink erstellt"),
    (
        "link.invalid",
        "The link you are trying to access is invalid or has expired.",
        "Der Link, den Sie aufrufen möchten, ist ungültig oder abgelaufen.",
    ),
    ("link.email_subject", "Your risk assessment report", "Ihr Risikobewertungsbericht"),
    ("response.recorded", "Response recorded", "Antwort gespeichert"),
    ("response.attachment_added", "File attached", "Datei angehängt"),
    (
        "response.submitted",
        "Thank you for your submission! Your responses have been recorded.",
        "Vielen Dank für Ihre Einreichung! Ihre Antworten wurden gespeichert.",
    ),
    // Auth
    ("auth.logged_in", "Signed in", "Angemeldet"),
    ("auth.logged_out", "Signed out", "Abgemeldet"),
];

lazy_static! {
    static ref TABLE: HashMap<&'static str, [&'static str; 2]> = MESSAGES
        .iter()
        .map(|(key, en, de)| (*key, [*en, *de]))
        .collect();
}

/// Look up a localized string. Unknown keys come back unchanged.
pub fn t(locale: Locale, key: &'static str) -> &'static str {
    match TABLE.get(key) {
        Some([en, de]) => match locale {
            Locale::En => *en,
            Locale::De => *de,
        },
        None => {
            tracing::warn!("Missing translation key: {}", key);
            key
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_lookup() {
        assert_eq!(t(Locale::En, "case.created"), "Case created");
        assert_eq!(t(Locale::De, "case.created"), "Fall erstellt");
    }

    #[test]
    fn test_unknown_key_falls_back_to_key() {
        assert_eq!(t(Locale::De, "does.not.exist"), "does.not.exist");
    }

    #[test]
    fn test_keys_are_unique_and_complete() {
        let mut seen = HashSet::new();
        for (key, en, de) in MESSAGES {
            assert!(seen.insert(*key), "duplicate key {}", key);
            assert!(!en.is_empty() && !de.is_empty(), "empty copy for {}", key);
        }
    }
}
