//! In-memory store implementations used by tests and the `memory` provider.

pub mod announcement;
pub mod user;

pub use announcement::MemoryAnnouncementStore;
pub use user::MemoryUserStore;
