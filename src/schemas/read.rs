use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::base::UserFileBase;
use crate::errors::ShapeMismatch;
use crate::models::StoredUserFile;

/// Output contract for a single file record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFileRead {
    id: Uuid,
    created_at: DateTime<Utc>,
    #[serde(flatten)]
    base: UserFileBase,
}

impl UserFileRead {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn base(&self) -> &UserFileBase {
        &self.base
    }

    pub fn file_name(&self) -> &str {
        &self.base.file_name
    }
}

impl TryFrom<StoredUserFile> for UserFileRead {
    type Error = ShapeMismatch;

    /// Copies the row as stored. Stored data is trusted, so nothing is
    /// re-validated; only absent columns are an error.
    fn try_from(row: StoredUserFile) -> Result<Self, Self::Error> {
        let missing: Vec<&'static str> = [
            ("file_name", row.file_name.is_none()),
            ("file_path", row.file_path.is_none()),
            ("size", row.size.is_none()),
            ("mime_type", row.mime_type.is_none()),
            ("user_id", row.user_id.is_none()),
            ("created_at", row.created_at.is_none()),
        ]
        .into_iter()
        .filter_map(|(column, absent)| absent.then_some(column))
        .collect();

        match row {
            StoredUserFile {
                id,
                file_name: Some(file_name),
                file_path: Some(file_path),
                size: Some(size),
                mime_type: Some(mime_type),
                user_id: Some(user_id),
                created_at: Some(created_at),
            } => Ok(Self {
                id,
                created_at,
                base: UserFileBase {
                    file_name,
                    file_path,
                    size,
                    mime_type,
                    user_id,
                },
            }),
            StoredUserFile { id, .. } => {
                let err = ShapeMismatch { id, missing };
                log::error!("{}", err);
                Err(err)
            }
        }
    }
}
