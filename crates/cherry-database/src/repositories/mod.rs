//! PostgreSQL repository implementations of the store traits.

pub mod announcement;
pub mod user;

pub use announcement::AnnouncementRepository;
pub use user::UserRepository;
