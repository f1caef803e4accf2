//! User domain entities.

pub mod model;
pub mod query;
pub mod role;

pub use model::{NewUser, User, UserChanges, normalize_email};
pub use query::{UserQuery, UserSortKey};
pub use role::UserRole;
