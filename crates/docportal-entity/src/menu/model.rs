//! Menu entity model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use docportal_core::AppError;

/// A top-level document category. Menus are seeded, never created at runtime.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Menu {
    /// Unique menu identifier.
    pub id: Uuid,
    /// Menu slug (unique), e.g. `dpp`.
    pub name: String,
    /// Parent menu. Present in the schema, unused by the portal.
    pub parent_id: Option<Uuid>,
}

/// The fixed set of menu slugs accepted in routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuSlug {
    /// DPP documents.
    Dpp,
    /// RM documents.
    Rm,
    /// LCCM documents.
    Lccm,
    /// PSM documents.
    Psm,
}

impl MenuSlug {
    /// Every accepted slug.
    pub const ALL: [MenuSlug; 4] = [Self::Dpp, Self::Rm, Self::Lccm, Self::Psm];

    /// Return the slug as stored in `menus.name`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dpp => "dpp",
            Self::Rm => "rm",
            Self::Lccm => "lccm",
            Self::Psm => "psm",
        }
    }

    /// Blob storage prefix for documents uploaded under this menu.
    pub fn storage_prefix(&self) -> String {
        format!("documents/{}", self.as_str())
    }
}

impl fmt::Display for MenuSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MenuSlug {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dpp" => Ok(Self::Dpp),
            "rm" => Ok(Self::Rm),
            "lccm" => Ok(Self::Lccm),
            "psm" => Ok(Self::Psm),
            _ => Err(AppError::not_found(format!("Unknown menu category '{s}'"))),
        }
    }
}
