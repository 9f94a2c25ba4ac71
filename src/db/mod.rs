pub mod appointment_repo;
pub mod availability_repo;
pub mod blocked_time_repo;
pub mod catalog_repo;
pub mod user_repo;

pub use appointment_repo::AppointmentRepository;
pub use availability_repo::AvailabilityRepository;
pub use blocked_time_repo::BlockedTimeRepository;
pub use catalog_repo::CatalogRepository;
pub use user_repo::UserRepository;
