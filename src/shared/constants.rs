/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Number of locations shown in the dashboard "cases by location" widget
pub const DASHBOARD_TOP_LOCATIONS: usize = 5;

/// Number of cases shown in the dashboard "recent cases" widget
pub const DASHBOARD_RECENT_CASES: usize = 5;

/// Scope claim carried by customer response links
pub const CUSTOMER_LINK_SCOPE: &str = "customer_response";

/// `uploaded_by` value for files attached through a customer link
pub const CUSTOMER_UPLOADER: &str = "customer";

// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Admin role - full access, including staff account administration
pub const ROLE_ADMIN: &str = "admin";

/// Employee role - works on cases and reports
pub const ROLE_EMPLOYEE: &str = "employee";
