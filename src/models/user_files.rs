use chrono::{DateTime, Utc};
use diesel::{Insertable, Queryable, Selectable};
use uuid::Uuid;

use crate::schemas::CreateUserFile;

/// A `user_files` row as the store hands it back. Columns other than the key
/// are nullable in the legacy table, so every one of them is optional here.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = crate::schema::user_files)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StoredUserFile {
    pub id: Uuid,
    pub file_name: Option<String>,
    pub file_path: Option<String>,
    pub size: Option<i64>,
    pub mime_type: Option<String>,
    pub user_id: Option<Uuid>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Insert payload. `id` and `created_at` are left to column defaults.
#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = crate::schema::user_files)]
pub struct NewUserFile {
    pub file_name: String,
    pub file_path: String,
    pub size: i64,
    pub mime_type: String,
    pub user_id: Uuid,
}

impl From<CreateUserFile> for NewUserFile {
    fn from(create: CreateUserFile) -> Self {
        let base = create.into_base();
        Self {
            file_name: base.file_name,
            file_path: base.file_path,
            size: base.size,
            mime_type: base.mime_type,
            user_id: base.user_id,
        }
    }
}
