use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    pub email: String,
    pub password_digest: String,
    pub role: Role,
    pub registered_at: i64,
}

impl Account {
    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}
