//! Constants for the scoreboard command-line front end

/// Default config file path
pub const CONFIG_FILE: &str = "scoreboard.toml";

/// HTTP timeout when the config does not set one
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Width the opportunity name column is truncated to in table output
pub const NAME_COLUMN_WIDTH: usize = 40;

/// Number of cells in the text score bar
pub const SCORE_BAR_WIDTH: usize = 10;
