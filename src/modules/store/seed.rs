//! Demo data the store starts with

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::features::cases::models::{Case, CaseDocument, CaseStatus, Note};
use crate::features::customers::models::{Customer, Location};
use crate::features::reports::models::{
    CustomerResponse, Level, Report, RiskAssessment, Severity, Suggestion,
};

const SEED_AUTHOR: &str = "emp-456";

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .earliest()
        .unwrap_or_default()
}

fn location(id: &str, name: &str, address: &str, lat: f64, lng: f64) -> Location {
    Location {
        id: id.to_string(),
        name: name.to_string(),
        address: address.to_string(),
        lat,
        lng,
    }
}

pub fn locations() -> Vec<Location> {
    vec![
        location("loc-1", "Vienna Central", "Stephansplatz 1, 1010 Vienna", 48.2082, 16.3738),
        location("loc-2", "Vienna West", "Mariahilfer Straße 100, 1070 Vienna", 48.1975, 16.3447),
        location("loc-3", "Salzburg Main", "Getreidegasse 9, 5020 Salzburg", 47.8031, 13.0447),
        location("loc-4", "Graz Downtown", "Hauptplatz 1, 8010 Graz", 47.0707, 15.4395),
        location(
            "loc-5",
            "Innsbruck Shop",
            "Maria-Theresien-Straße 18, 6020 Innsbruck",
            47.2654,
            11.3927,
        ),
        location("loc-6", "Linz Center", "Landstraße 17, 4020 Linz", 48.3064, 14.2858),
        location(
            "loc-7",
            "Klagenfurt Mall",
            "Völkermarkter Straße 1, 9020 Klagenfurt",
            46.6228,
            14.3051,
        ),
        location("loc-8", "Bregenz Lakeside", "Seestraße 5, 6900 Bregenz", 47.5031, 9.7471),
        location("loc-9", "Eisenstadt Plaza", "Hauptstraße 10, 7000 Eisenstadt", 47.845, 16.5336),
        location("loc-10", "St. Pölten Center", "Rathausplatz 1, 3100 St. Pölten", 48.2047, 15.6256),
    ]
}

fn customer(
    id: i64,
    name: &str,
    email: &str,
    phone: &str,
    website: &str,
    industry: &str,
    location_ids: &[&str],
) -> Customer {
    Customer {
        id,
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        website: website.to_string(),
        industry: industry.to_string(),
        location_ids: location_ids.iter().map(|id| id.to_string()).collect(),
    }
}

pub fn customers() -> Vec<Customer> {
    vec![
        customer(
            1,
            "Acme Corp",
            "contact@acmecorp.com",
            "+43 1 234567890",
            "www.acmecorp.com",
            "Retail",
            &["loc-1", "loc-3", "loc-5", "loc-7", "loc-9"],
        ),
        customer(
            2,
            "TechStart Inc",
            "info@techstart.com",
            "+43 662 9876543",
            "www.techstart.com",
            "Technology",
            &["loc-2", "loc-4", "loc-6"],
        ),
        customer(
            3,
            "Global Services",
            "support@globalservices.com",
            "+43 512 1122334",
            "www.globalservices.com",
            "Services",
            &["loc-8", "loc-10"],
        ),
    ]
}

struct SeedCase {
    id: i64,
    customer_id: i64,
    location_id: &'static str,
    title: &'static str,
    description: &'static str,
    status: CaseStatus,
    created_at: DateTime<Utc>,
}

fn seed_cases() -> Vec<SeedCase> {
    vec![
        SeedCase {
            id: 1,
            customer_id: 1,
            location_id: "loc-1",
            title: "Annual Safety Inspection",
            description: "Yearly on-site safety walkthrough of the Vienna flagship store.",
            status: CaseStatus::Open,
            created_at: at(2023, 5, 15, 10, 30),
        },
        SeedCase {
            id: 2,
            customer_id: 1,
            location_id: "loc-3",
            title: "Equipment Maintenance",
            description: "Review of maintenance schedules for refrigeration and lifting equipment.",
            status: CaseStatus::InProgress,
            created_at: at(2023, 5, 20, 14, 45),
        },
        SeedCase {
            id: 3,
            customer_id: 2,
            location_id: "loc-2",
            title: "Security Assessment",
            description: "Physical and IT security assessment of the Vienna West office.",
            status: CaseStatus::Closed,
            created_at: at(2023, 4, 10, 9, 15),
        },
        SeedCase {
            id: 4,
            customer_id: 2,
            location_id: "loc-4",
            title: "Staff Training",
            description: "Evaluate safety training coverage for new staff.",
            status: CaseStatus::Open,
            created_at: at(2023, 6, 1, 11, 0),
        },
        SeedCase {
            id: 5,
            customer_id: 3,
            location_id: "loc-8",
            title: "Risk Evaluation",
            description: "General risk evaluation after the lakeside renovation.",
            status: CaseStatus::InProgress,
            created_at: at(2023, 5, 25, 16, 30),
        },
        SeedCase {
            id: 6,
            customer_id: 1,
            location_id: "loc-5",
            title: "Compliance Review",
            description: "Check of fire code and accessibility compliance.",
            status: CaseStatus::Open,
            created_at: at(2023, 6, 5, 13, 20),
        },
        SeedCase {
            id: 7,
            customer_id: 2,
            location_id: "loc-6",
            title: "Emergency Response Plan",
            description: "Draft and review of the site emergency response plan.",
            status: CaseStatus::InProgress,
            created_at: at(2023, 5, 18, 10, 0),
        },
        SeedCase {
            id: 8,
            customer_id: 3,
            location_id: "loc-10",
            title: "Workplace Assessment",
            description: "Ergonomics and workplace hazard assessment.",
            status: CaseStatus::Closed,
            created_at: at(2023, 4, 22, 15, 45),
        },
    ]
}

fn risk(
    id: &str,
    title: &str,
    description: &str,
    severity: Severity,
    impact_areas: &[&str],
    potential_consequences: &str,
) -> RiskAssessment {
    RiskAssessment {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        severity,
        impact_areas: impact_areas.iter().map(|a| a.to_string()).collect(),
        potential_consequences: potential_consequences.to_string(),
    }
}

fn suggestion(
    id: &str,
    risk_id: &str,
    description: &str,
    priority: Level,
    estimated_cost: Level,
    timeframe: &str,
) -> Suggestion {
    Suggestion {
        id: id.to_string(),
        risk_id: risk_id.to_string(),
        description: description.to_string(),
        priority,
        estimated_cost,
        timeframe: timeframe.to_string(),
        customer_response: CustomerResponse::default(),
    }
}

fn inspection_report(title: &str) -> Report {
    Report {
        title: format!("{} Report", title),
        overview: "This risk assessment report identifies potential hazards and gives detailed \
                   recommendations for mitigating them. The assessment follows industry standards \
                   and regulatory requirements."
            .to_string(),
        risk_assessments: vec![
            risk(
                "risk-1",
                "Safety concerns",
                "Insufficient emergency exits, missing fire extinguishers and poor stairwell \
                 lighting were found during the inspection.",
                Severity::High,
                &["Employee safety", "Regulatory compliance", "Liability"],
                "Injuries, regulatory fines, potential lawsuits",
            ),
            risk(
                "risk-2",
                "Maintenance issues",
                "Maintenance procedures for critical equipment are not followed and several \
                 machines show wear beyond acceptable limits.",
                Severity::Medium,
                &["Operational continuity", "Equipment lifetime", "Safety"],
                "Equipment failure, production delays, higher repair costs",
            ),
            risk(
                "risk-3",
                "Data security gaps",
                "Outdated software, weak password rules and insufficient access control for \
                 sensitive information.",
                Severity::High,
                &["Data protection", "Customer trust", "Regulatory compliance"],
                "Data breaches, regulatory penalties, reputational damage",
            ),
        ],
        suggestions: vec![
            suggestion(
                "sug-1",
                "risk-1",
                "Run a safety training programme for all staff, keep emergency exits marked and \
                 clear, and add fire extinguishers with a monthly inspection plan.",
                Level::High,
                Level::Medium,
                "1-3 months",
            ),
            suggestion(
                "sug-2",
                "risk-2",
                "Create a maintenance plan with named owners and track maintenance in a digital \
                 system.",
                Level::Medium,
                Level::Low,
                "1-2 months",
            ),
            suggestion(
                "sug-3",
                "risk-3",
                "Update all software, tighten password rules and enable two-factor \
                 authentication for accounts with access to sensitive data.",
                Level::High,
                Level::Medium,
                "1 month",
            ),
        ],
        conclusion: "Addressing these issues promptly will considerably reduce the identified \
                     risks and improve overall safety and operational efficiency."
            .to_string(),
    }
}

fn document(seed: SeedCase) -> CaseDocument {
    let case = Case {
        id: seed.id,
        customer_id: seed.customer_id,
        location_id: seed.location_id.to_string(),
        title: seed.title.to_string(),
        description: seed.description.to_string(),
        status: CaseStatus::Open,
        created_at: seed.created_at,
        updated_at: seed.created_at,
    };

    let report = if seed.id == 1 {
        inspection_report(seed.title)
    } else {
        Report::empty(format!("{} Report", seed.title))
    };

    let mut doc = CaseDocument::new(case, report, SEED_AUTHOR);

    // Replay the lifecycle so the history matches the seeded status
    if seed.status != CaseStatus::Open {
        doc.change_status(
            CaseStatus::InProgress,
            SEED_AUTHOR,
            None,
            seed.created_at + Duration::days(2),
        );
    }
    if seed.status == CaseStatus::Closed {
        doc.change_status(
            CaseStatus::Closed,
            SEED_AUTHOR,
            Some("All findings addressed".to_string()),
            seed.created_at + Duration::days(14),
        );
    }

    if seed.id == 1 {
        doc.notes.push(Note {
            id: "note-1".to_string(),
            content: "Site manager asked for the report before the end of the quarter.".to_string(),
            created_by: SEED_AUTHOR.to_string(),
            created_at: seed.created_at + Duration::hours(3),
        });
    }

    doc
}

pub fn case_documents() -> Vec<CaseDocument> {
    seed_cases().into_iter().map(document).collect()
}
