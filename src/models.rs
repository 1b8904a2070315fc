pub mod user_files;

pub use user_files::{NewUserFile, StoredUserFile};
