pub mod attendance_service;
pub mod auth_service;
pub mod incident_service;
pub mod summary_service;
pub mod user_service;
