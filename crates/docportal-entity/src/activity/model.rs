//! Activity log entry model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use docportal_core::AppError;

/// Kind of recorded document activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "activity_action", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ActivityAction {
    /// A file was uploaded.
    Upload,
    /// A file was downloaded.
    Download,
}

impl ActivityAction {
    /// Return the lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::Download => "download",
        }
    }
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActivityAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upload" => Ok(Self::Upload),
            "download" => Ok(Self::Download),
            _ => Err(AppError::validation(format!(
                "Invalid activity action '{s}'. Expected one of: upload, download"
            ))),
        }
    }
}

/// An append-only record of a user acting on a file.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ActivityLog {
    /// Unique entry identifier.
    pub id: Uuid,
    /// The acting user.
    pub user_id: Uuid,
    /// The file acted upon.
    pub file_id: Uuid,
    /// What happened.
    pub action: ActivityAction,
    /// When it happened.
    pub occurred_at: DateTime<Utc>,
}

/// An activity entry joined with user and file names for display.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ActivityLogView {
    /// The log row.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub entry: ActivityLog,
    /// Name of the acting user.
    pub user_name: String,
    /// Name of the file.
    pub file_name: String,
}

/// Data required to append an activity entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateActivityLog {
    /// The acting user.
    pub user_id: Uuid,
    /// The file acted upon.
    pub file_id: Uuid,
    /// What happened.
    pub action: ActivityAction,
}
