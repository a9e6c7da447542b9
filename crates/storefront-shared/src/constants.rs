//! Application-wide constants

/// Session key holding the serialized identity blob.
pub const SESSION_USER_KEY: &str = "user";

pub const AUDIT_ACTION_LOGOUT: &str = "logout";

/// Placeholder used when no identity can be read from the session.
pub const UNKNOWN_IDENTITY: &str = "unknown";

pub const DEFAULT_SESSION_COOKIE: &str = "storefront_session";
/// Carries the session id in both directions when cookies are disabled.
pub const SESSION_ID_HEADER: &str = "x-session-id";
pub const DEFAULT_LOGOUT_REDIRECT: &str = "/?page=landing&logout=success";
pub const DEFAULT_SESSION_TTL_SECONDS: i64 = 1440;
pub const DEFAULT_CLEANUP_INTERVAL_SECONDS: u64 = 300;

pub const MESSAGE_SESSION_UPDATED: &str = "Session updated";
pub const MESSAGE_SESSION_CLEARED: &str = "Session cleared";
pub const MESSAGE_SESSION_LOADED: &str = "Session loaded";
pub const MESSAGE_INVALID_DATA: &str = "Invalid data";
