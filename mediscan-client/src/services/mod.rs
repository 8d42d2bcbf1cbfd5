pub mod analysis;
pub mod auth;
pub mod gateway;
pub mod metrics;
pub mod notification;
pub mod report;
pub mod session_store;
pub mod storage;
pub mod user;

pub use analysis::AnalysisService;
pub use auth::AuthService;
pub use gateway::GatewayClient;
pub use notification::NotificationService;
pub use report::ReportService;
pub use session_store::SessionStore;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
pub use user::UserService;
