pub mod auth;
pub mod availability_service;
pub mod blocked_time_service;
pub mod catalog_service;
pub mod scheduler_service;

pub use auth::AuthService;
pub use availability_service::AvailabilityService;
pub use blocked_time_service::BlockedTimeService;
pub use catalog_service::CatalogService;
pub use scheduler_service::SchedulerService;
