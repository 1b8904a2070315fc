//! Validated input, output and list shapes for user-uploaded file records.
//!
//! Client JSON becomes a [`CreateUserFile`] only after every base field rule
//! passes; stored rows come back out as [`UserFileRead`], grouped into
//! [`PaginatedUserFileList`] pages, and deletes are acknowledged with
//! [`UserFileRemove`]. Everything here is a pure transformation; the store and
//! the router live elsewhere.

pub mod config;
pub mod errors;
pub mod models;
pub mod requests;
pub mod schema;
pub mod schemas;

pub use config::{ConfigError, ListingConfig};
pub use errors::{FieldViolation, PageWindowError, SchemaError, ShapeMismatch, ValidationError};
pub use models::{NewUserFile, StoredUserFile};
pub use requests::{PageQuery, ValidatedCreate};
pub use schemas::{
    CreateUserFile, PageRequest, PaginatedUserFileList, RemovalOutcome, UserFileBase,
    UserFileRead, UserFileRemove,
};
