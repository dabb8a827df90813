//! User profile model for storage and API.

use serde::{Deserialize, Serialize};

/// Role attached to a profile.
///
/// Stored as a plain string. Values outside the known set are kept as
/// `Unrecognized` so that a bad record still loads and gets routed to the
/// fallback notice.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Mentor,
    Intern,
    Unrecognized(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "admin",
            Role::Mentor => "mentor",
            Role::Intern => "intern",
            Role::Unrecognized(raw) => raw,
        }
    }

    /// Display label used in the users table; unknown roles show the raw value.
    pub fn label(&self) -> String {
        match self {
            Role::Admin => "👑 Администратор".to_string(),
            Role::Mentor => "🧑‍🏫 Наставник".to_string(),
            Role::Intern => "🧑‍💻 Стажёр".to_string(),
            Role::Unrecognized(raw) => raw.clone(),
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Role::Unrecognized(_))
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "admin" => Role::Admin,
            "mentor" => Role::Mentor,
            "intern" => Role::Intern,
            _ => Role::Unrecognized(value),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

/// User profile stored in Firestore (`users/{id}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Document ID (identity subject id, or `temp_<millis>` for placeholders).
    /// Never written as a field.
    #[serde(alias = "_firestore_id", default, skip_serializing)]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub blocked: bool,
    /// Creation time (RFC 3339). Profiles seeded by hand may not have one.
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl UserProfile {
    /// Status badge text.
    pub fn status_label(&self) -> &'static str {
        if self.blocked {
            "Заблокирован"
        } else {
            "Активен"
        }
    }
}
