//! User and authentication payloads.

use std::path::Path;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The signed-in user as persisted in the session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
}

impl User {
    /// Staff and superusers both count as administrators.
    pub fn is_admin(&self) -> bool {
        self.is_staff || self.is_superuser
    }
}

/// Credentials sent to the login endpoint.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login endpoint reply. Older backends omit the permission flags.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    pub token: String,
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
}

impl LoginResponse {
    pub fn user(&self) -> User {
        User {
            id: self.id,
            username: self.username.clone(),
            is_staff: self.is_staff,
            is_superuser: self.is_superuser,
        }
    }
}

/// A profile picture to upload with a registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub file_name: String,
    pub mime_type: String,
    pub data: Bytes,
}

impl Photo {
    /// Read a photo from disk, guessing the MIME type from the extension.
    pub async fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "foto".to_string());

        Ok(Self {
            mime_type: mime_guess::from_path(path)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
            file_name,
            data: Bytes::from(data),
        })
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Registration form payload, sent as multipart form data.
///
/// Optional fields that are `None` are left out of the request entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub photo: Option<Photo>,
    pub notify_by_email: Option<bool>,
    pub notify_recommendations: Option<bool>,
    pub notify_general: Option<bool>,
    /// Only honored when an administrator creates the account.
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

impl RegisterRequest {
    /// Text fields in wire order, skipping absent and empty values.
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("username", self.username.clone()),
            ("password", self.password.clone()),
        ];

        let optional = [
            ("email", &self.email),
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("bio", &self.bio),
        ];
        for (name, value) in optional {
            if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
                fields.push((name, v.to_string()));
            }
        }

        let flags = [
            ("notifPorEmail", self.notify_by_email),
            ("notifRecomendaciones", self.notify_recommendations),
            ("notifGenerales", self.notify_general),
            ("is_staff", self.is_staff),
            ("is_superuser", self.is_superuser),
        ];
        for (name, value) in flags {
            if let Some(v) = value {
                fields.push((name, v.to_string()));
            }
        }

        fields
    }
}

/// Registration endpoint reply.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct RegisterResponse {
    pub token: String,
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub is_staff: Option<bool>,
    #[serde(default)]
    pub is_superuser: Option<bool>,
    #[serde(default)]
    pub message: String,
}

impl RegisterResponse {
    pub fn user(&self) -> User {
        User {
            id: self.id,
            username: self.username.clone(),
            is_staff: self.is_staff.unwrap_or(false),
            is_superuser: self.is_superuser.unwrap_or(false),
        }
    }
}
