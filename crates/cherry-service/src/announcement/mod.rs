//! Announcement services.

pub mod service;

pub use service::{
    AnnouncementDetail, AnnouncementService, Author, CreateAnnouncementRequest,
    UpdateAnnouncementRequest, UpdateStatusRequest,
};
