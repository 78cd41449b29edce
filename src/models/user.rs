use serde::{Deserialize, Serialize};

use crate::utils::validation::is_valid_email;

/// Raw shape of a document in the `users` collection. Either field may be
/// missing or empty; eligibility is decided by `eligible_record`.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct UserDocument {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// A user record eligible for dispatch: both fields present, non-empty, and
/// a syntactically valid email.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserRecord {
    pub email: String,
    pub name: String,
}

impl UserDocument {
    pub fn eligible_record(&self) -> Option<UserRecord> {
        let email = self.email.as_deref().unwrap_or("");
        let name = self.name.as_deref().unwrap_or("");

        if email.is_empty() || name.is_empty() || !is_valid_email(email) {
            return None;
        }

        Some(UserRecord {
            email: email.to_string(),
            name: name.to_string(),
        })
    }
}
