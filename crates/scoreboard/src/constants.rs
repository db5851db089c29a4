//! Centralized constants for the opportunity scoreboard
//!
//! Display thresholds, colors and fixed strings shared by enrichment and the
//! view state. Anything that varies per deployment lives in the CLI config.

// =============================================================================
// Record Links
// =============================================================================

/// Path prefix for an opportunity record page (append the record Id)
pub const RECORD_URL_PREFIX: &str = "/lightning/r/Opportunity/";

/// Path suffix for an opportunity record page
pub const RECORD_URL_SUFFIX: &str = "/view";

// =============================================================================
// Placeholders
// =============================================================================

/// Shown in place of a missing amount or close date
pub const PLACEHOLDER: &str = "-";

// =============================================================================
// Score Bar
// =============================================================================

/// Lower bound of the displayed score range
pub const SCORE_MIN: f64 = 0.0;

/// Upper bound of the displayed score range
pub const SCORE_MAX: f64 = 100.0;

/// Scores at or above this draw a green bar
pub const HOT_SCORE_THRESHOLD: f64 = 70.0;

/// Scores at or above this (and below the hot threshold) draw an orange bar
pub const WARM_SCORE_THRESHOLD: f64 = 40.0;

pub const BAR_COLOR_GREEN: &str = "#2e844a";
pub const BAR_COLOR_ORANGE: &str = "#fe9339";
pub const BAR_COLOR_RED: &str = "#c23934";

// =============================================================================
// Category Badge
// =============================================================================

/// Base CSS class every category badge carries
pub const BADGE_BASE_CLASS: &str = "slds-badge";

/// Category used for the badge when a record has none
pub const DEFAULT_BADGE_CATEGORY: &str = "Cold";

// =============================================================================
// Sort Indicator
// =============================================================================

pub const SORT_ASC_GLYPH: &str = "↑";
pub const SORT_DESC_GLYPH: &str = "↓";
