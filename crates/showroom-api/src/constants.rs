//! Names shared between handlers, middleware and tests.

/// Cookie carrying the admin session token
pub const AUTH_COOKIE: &str = "token";

/// Cookie identifying a website visitor across requests
pub const VISITOR_COOKIE: &str = "visitor_id";

/// Mount point for files served by the local media host
pub const LOCAL_MEDIA_ROUTE: &str = "/media";
