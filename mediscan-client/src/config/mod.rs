//! Endpoint paths relative to the configured gateway base URL.

pub mod auth {
    pub const LOGIN: &str = "/auth/login";
    pub const REGISTER: &str = "/auth/register";
    pub const VERIFY_EMAIL: &str = "/auth/verify-email";
    pub const VERIFY_EMAIL_BY_PATH: &str = "/auth/verify-email/:email";
    pub const RESET_PASSWORD: &str = "/auth/reset-password";
    pub const REFRESH_TOKEN: &str = "/auth/refresh-token";
    pub const LOGOUT: &str = "/auth/logout";
}

/// Relative to the IAM prefix (`api.iam_prefix`).
pub mod iam {
    pub const LOGIN: &str = "/login";
    pub const REGISTER: &str = "/register";
    pub const CHECK_EMAIL: &str = "/check-email/:email";
}

pub mod users {
    pub const PROFILE: &str = "/users/profile";
}

pub mod analysis {
    pub const UPLOAD: &str = "/analysis/upload";
    pub const LIST: &str = "/analysis/list";
    pub const BY_ID: &str = "/analysis/:id";
}

pub mod reports {
    pub const LIST: &str = "/reports/list";
    pub const BY_ID: &str = "/reports/:id";
    pub const DOWNLOAD: &str = "/reports/:id/download";
}

pub mod notifications {
    pub const LIST: &str = "/notifications/list";
    pub const MARK_READ: &str = "/notifications/:id/read";
    pub const MARK_ALL_READ: &str = "/notifications/read-all";
}
