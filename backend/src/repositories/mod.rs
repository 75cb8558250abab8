//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod entries;
pub mod tags;
pub mod templates;
pub mod user;

pub use entries::{
    CreateEntry, EntryRecord, EntryRepository, NewEntryTag, NewPhoto, NewResponse, NewSnapshot,
    PhotoRecord, ResponseRecord, ResponseSearchRecord, SnapshotRecord,
};
pub use tags::{CreateTag, EntryTagRecord, TagRecord, TagRepository, TagWithCountRecord, UpdateTag};
pub use templates::{CreateTemplate, TemplateRecord, TemplateRepository, UpdateTemplate};
pub use user::{UpdateUserSettings, UserRepository};
