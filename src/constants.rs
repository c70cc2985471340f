/// Constants module to avoid magic numbers in the codebase

// Application identity
pub const APP_NAME: &str = "mru-switch";
pub const ENV_PREFIX: &str = "MRU_SWITCH_";

// History
pub const MAX_HISTORY: usize = 50;
pub const HISTORY_STORE_KEY: &str = "history";

// Indicator
pub const MIN_ROW_LENGTH: usize = 3;
pub const MAX_ROW_LENGTH: usize = 7;
pub const DEFAULT_ROW_LENGTH: usize = 5;
pub const DEFAULT_TOAST_DURATION_MS: u64 = 1500;
pub const UNKNOWN_CONVERSATION_NAME: &str = "Unknown conversation";

// Session lifetime bound (0 disables it)
pub const DEFAULT_MAX_SESSION_MS: u64 = 30_000;

// Terminal front-end
pub const UI_POLL_INTERVAL_MS: u64 = 50;
pub const LOG_FILE_NAME: &str = "mru-switch.log";
