//! Request and response shapes for user file records.

pub mod base;
mod create;
mod paginated;
mod read;
mod remove;

pub use base::{BASE_FIELD_RULES, FieldRule, UserFileBase, WireKind};
pub use create::CreateUserFile;
pub use paginated::{PageRequest, PaginatedUserFileList};
pub use read::UserFileRead;
pub use remove::{RemovalOutcome, UserFileRemove};
