pub mod analysis;
pub mod auth;
pub mod notification;
pub mod pagination;
pub mod report;
pub mod user;

pub use analysis::{
    Analysis, AnalysisListResponse, AnalysisResult, AnalysisStatus, AnalysisType, ImageUpload,
    UploadAnalysisRequest,
};
pub use auth::{
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, ResetPasswordRequest,
    ResetPasswordResponse, Session, TokenPair, VerifyEmailResponse,
};
pub use notification::{Notification, NotificationListResponse, NotificationType};
pub use pagination::{PaginationParams, SortOrder};
pub use report::{Report, ReportListResponse, ReportStatus};
pub use user::{ProfessionalData, UpdateProfileRequest, UserProfile};
