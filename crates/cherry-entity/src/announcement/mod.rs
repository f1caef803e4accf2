//! Announcement domain entities.

pub mod model;
pub mod query;
pub mod status;

pub use model::{Announcement, AnnouncementChanges, NewAnnouncement};
pub use query::{AnnouncementQuery, AnnouncementSortKey, PublishedQuery};
pub use status::AnnouncementStatus;
