use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What the store reported for a delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalOutcome {
    Removed { file_name: String },
    NotFound { last_known_name: Option<String> },
}

impl RemovalOutcome {
    /// Interprets an affected-row count from a `DELETE ... WHERE id = $1`.
    pub fn from_affected_rows(affected: usize, file_name: Option<String>) -> Self {
        if affected > 0 {
            RemovalOutcome::Removed {
                file_name: file_name.unwrap_or_default(),
            }
        } else {
            RemovalOutcome::NotFound {
                last_known_name: file_name,
            }
        }
    }
}

/// Delete acknowledgement. `deleted` is the store's outcome, not intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFileRemove {
    pub id: Uuid,
    pub file_name: String,
    pub deleted: bool,
}

impl UserFileRemove {
    pub fn from_outcome(id: Uuid, outcome: RemovalOutcome) -> Self {
        match outcome {
            RemovalOutcome::Removed { file_name } => Self {
                id,
                file_name,
                deleted: true,
            },
            RemovalOutcome::NotFound { last_known_name } => {
                log::debug!("delete of user file {} matched no record", id);
                Self {
                    id,
                    file_name: last_known_name.unwrap_or_default(),
                    deleted: false,
                }
            }
        }
    }
}
