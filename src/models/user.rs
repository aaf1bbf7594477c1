//! User record and its request/response shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Stored user record. Never serialized directly; see [`UserResponse`].
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub password_hash: String,
    pub age: Option<u32>,
    pub is_adm: bool,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
}

/// Public view of a user: everything except the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub uuid: Uuid,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    pub is_adm: bool,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            uuid: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            age: user.age,
            is_adm: user.is_adm,
            created_on: user.created_on,
            updated_on: user.updated_on,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

/// POST /users body.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "isAdm", alias = "isAdmin")]
    pub is_adm: bool,
}

/// PATCH /users/:id body. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub name: Option<String>,
    /// Set whenever the body carries `isAdm`, even as `null`.
    #[serde(default, rename = "isAdm", deserialize_with = "present")]
    pub is_adm: Option<serde_json::Value>,
    /// Same for the `isAdmin` spelling. Kept as its own field so a body carrying
    /// both keys is still rejected as an admin-flag change.
    #[serde(default, rename = "isAdmin", deserialize_with = "present")]
    pub is_admin: Option<serde_json::Value>,
}

impl UpdateUserRequest {
    pub fn touches_is_adm(&self) -> bool {
        self.is_adm.is_some() || self.is_admin.is_some()
    }
}

/// Field changes applied to the current stored record. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub age: Option<u32>,
    pub name: Option<String>,
}

impl UserPatch {
    /// Merge into `user` and refresh `updated_on`.
    pub fn apply(self, user: &mut User) {
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(password_hash) = self.password_hash {
            user.password_hash = password_hash;
        }
        if let Some(age) = self.age {
            user.age = Some(age);
        }
        if let Some(name) = self.name {
            user.name = Some(name);
        }
        user.updated_on = Utc::now();
    }
}

fn present<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

/// POST /login body.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}
