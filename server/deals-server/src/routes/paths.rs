//! Centralized route path constants
//!
//! Route definitions and the test suite both refer to these constants,
//! so a path can only ever change in one place.

/// Mount point for uploaded media.
pub const MEDIA: &str = "/media";

/// Page endpoints
pub mod deals {
    pub const HOME: &str = "/";
    pub const TASK_ADDED: &str = "/added";
    pub const TASK_LIST: &str = "/tasks";
    pub const TASK_DETAIL: &str = "/tasks/:slug";
}

/// Health check endpoints
pub mod health {
    pub const HEALTH: &str = "/health";
}
