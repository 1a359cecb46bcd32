//! Column names of the raw and cleaned layoff datasets
//!
//! Column names are part of the input contract: a raw frame missing any of
//! [`REQUIRED_RAW_COLUMNS`] cannot be cleaned.

// Raw columns
pub const COMPANY: &str = "company";
pub const LOCATION: &str = "location";
pub const COUNTRY: &str = "country";
pub const INDUSTRY: &str = "industry";
pub const STAGE: &str = "stage";
pub const DATE: &str = "date";
pub const DATE_ADDED: &str = "date_added";
pub const TOTAL_LAID_OFF: &str = "total_laid_off";
pub const PERCENTAGE_LAID_OFF: &str = "percentage_laid_off";
pub const FUNDS_RAISED: &str = "funds_raised";

// Derived columns
pub const FUNDS_RAISED_CLEAN: &str = "funds_raised_clean";
pub const YEAR: &str = "year";
pub const MONTH: &str = "month";
pub const QUARTER: &str = "quarter";
pub const ESTIMATED_COMPANY_SIZE: &str = "estimated_company_size";
pub const COMPANY_SIZE_CATEGORY: &str = "company_size_category";

/// Fill value for missing geography
pub const UNKNOWN: &str = "Unknown";

pub const REQUIRED_RAW_COLUMNS: [&str; 10] = [
    DATE,
    DATE_ADDED,
    PERCENTAGE_LAID_OFF,
    FUNDS_RAISED,
    TOTAL_LAID_OFF,
    COMPANY,
    COUNTRY,
    LOCATION,
    INDUSTRY,
    STAGE,
];
