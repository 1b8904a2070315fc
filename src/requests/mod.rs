pub mod pagination;
pub mod user_files;

pub use pagination::PageQuery;
pub use user_files::ValidatedCreate;
