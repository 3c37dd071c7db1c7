//! Operator form state.

use std::sync::RwLock;

use shared::domain::{ContextField, RequestContext};

pub trait FormStateReader: Send + Sync {
    /// Trimmed snapshot of the four persistent fields. Does not validate.
    fn read_context(&self) -> RequestContext;
}

#[derive(Debug, Default, Clone)]
struct RawFields {
    access_key: String,
    secret_key: String,
    region: String,
    bucket_name: String,
}

/// Editable form fields as typed by the operator, untrimmed.
#[derive(Debug, Default)]
pub struct FormFields {
    raw: RwLock<RawFields>,
}

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, field: ContextField, value: impl Into<String>) {
        let value = value.into();
        let mut raw = self.raw.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        match field {
            ContextField::AccessKey => raw.access_key = value,
            ContextField::SecretKey => raw.secret_key = value,
            ContextField::Region => raw.region = value,
            ContextField::BucketName => raw.bucket_name = value,
        }
    }

    pub fn with(self, field: ContextField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn clear(&self, field: ContextField) {
        self.set(field, String::new());
    }
}

impl FormStateReader for FormFields {
    fn read_context(&self) -> RequestContext {
        let raw = self.raw.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        RequestContext::new(&raw.access_key, &raw.secret_key, &raw.region, &raw.bucket_name)
    }
}

impl FormStateReader for RequestContext {
    fn read_context(&self) -> RequestContext {
        RequestContext::new(&self.access_key, &self.secret_key, &self.region, &self.bucket_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_context_trims_current_values() {
        let form = FormFields::new()
            .with(ContextField::AccessKey, " AKIA ")
            .with(ContextField::SecretKey, "secret")
            .with(ContextField::Region, "us-east-1\n")
            .with(ContextField::BucketName, "  my-bucket");

        let context = form.read_context();
        assert_eq!(context, RequestContext::new("AKIA", "secret", "us-east-1", "my-bucket"));
    }

    #[test]
    fn read_context_is_fresh_on_every_call() {
        let form = FormFields::new().with(ContextField::BucketName, "first");
        assert_eq!(form.read_context().bucket_name, "first");

        form.set(ContextField::BucketName, "second");
        assert_eq!(form.read_context().bucket_name, "second");

        form.clear(ContextField::BucketName);
        assert!(form.read_context().missing_fields().contains(&ContextField::BucketName));
    }
}
