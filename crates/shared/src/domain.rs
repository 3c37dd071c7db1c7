use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the four persistent form fields every action requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextField {
    AccessKey,
    SecretKey,
    Region,
    BucketName,
}

impl ContextField {
    pub const ALL: [ContextField; 4] = [
        ContextField::AccessKey,
        ContextField::SecretKey,
        ContextField::Region,
        ContextField::BucketName,
    ];

    /// Key used for this field in request payloads.
    pub fn wire_key(self) -> &'static str {
        match self {
            ContextField::AccessKey => "access_key",
            ContextField::SecretKey => "secret_key",
            ContextField::Region => "region",
            ContextField::BucketName => "bucket_name",
        }
    }

    pub fn is_wire_key(key: &str) -> bool {
        Self::ALL.iter().any(|field| field.wire_key() == key)
    }
}

impl fmt::Display for ContextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_key())
    }
}

/// Credentials and target container, trimmed and snapshotted per dispatch.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    pub bucket_name: String,
}

impl RequestContext {
    pub fn new(
        access_key: impl AsRef<str>,
        secret_key: impl AsRef<str>,
        region: impl AsRef<str>,
        bucket_name: impl AsRef<str>,
    ) -> Self {
        Self {
            access_key: access_key.as_ref().trim().to_string(),
            secret_key: secret_key.as_ref().trim().to_string(),
            region: region.as_ref().trim().to_string(),
            bucket_name: bucket_name.as_ref().trim().to_string(),
        }
    }

    pub fn field(&self, field: ContextField) -> &str {
        match field {
            ContextField::AccessKey => &self.access_key,
            ContextField::SecretKey => &self.secret_key,
            ContextField::Region => &self.region,
            ContextField::BucketName => &self.bucket_name,
        }
    }

    pub fn missing_fields(&self) -> Vec<ContextField> {
        ContextField::ALL
            .into_iter()
            .filter(|field| self.field(*field).is_empty())
            .collect()
    }
}

// Keeps the secret out of tracing output.
impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("region", &self.region)
            .field("bucket_name", &self.bucket_name)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusSeverity {
    #[default]
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlState {
    #[default]
    Idle,
    Busy,
}
