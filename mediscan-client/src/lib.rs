pub mod adapters;
pub mod config;
pub mod models;
pub mod services;
pub mod startup;
pub mod utils;

pub use mediscan_core::{ApiError, AppError};

use services::{
    AnalysisService, AuthService, NotificationService, ReportService, SessionStore, UserService,
};

/// Every client-side service, sharing one gateway client and session store.
#[derive(Clone)]
pub struct MediscanClient {
    pub session: SessionStore,
    pub auth: AuthService,
    pub users: UserService,
    pub analysis: AnalysisService,
    pub reports: ReportService,
    pub notifications: NotificationService,
}

impl MediscanClient {
    pub fn new(
        session: SessionStore,
        auth: AuthService,
        users: UserService,
        analysis: AnalysisService,
        reports: ReportService,
        notifications: NotificationService,
    ) -> Self {
        Self {
            session,
            auth,
            users,
            analysis,
            reports,
            notifications,
        }
    }
}
