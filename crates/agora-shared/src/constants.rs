/// Application name
pub const APP_NAME: &str = "Agora";

/// Default backend base URL for local development
pub const DEFAULT_API_URL: &str = "http://localhost:3004";

/// Default HTTP request timeout in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Persisted session keys
pub const SESSION_KEY_LOGGED_IN: &str = "is_logged_in";
pub const SESSION_KEY_USER_DATA: &str = "user_data";

/// Shown when the server rejected a request without saying why
pub const GENERIC_SERVER_MESSAGE: &str = "The server could not process the request.";

/// Shown when a request never got a response
pub const GENERIC_NETWORK_MESSAGE: &str =
    "Could not reach the server. Check your connection and try again.";
