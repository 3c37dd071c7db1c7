use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    domain::{ContextField, RequestContext},
    error::PayloadError,
};

pub const CREATE_BUCKET_ENDPOINT: &str = "/create_bucket";
pub const UPLOAD_FILE_ENDPOINT: &str = "/upload_file";
pub const APPLY_CUSTOM_LIFECYCLE_ENDPOINT: &str = "/apply_custom_lifecycle";
pub const ENABLE_INTELLIGENT_TIERING_ENDPOINT: &str = "/enable_intelligent_tiering";
pub const GET_LOGS_ENDPOINT: &str = "/get_logs";

/// Literal status the backend uses for a successful operation.
pub const SUCCESS_STATUS: &str = "success";

/// Action-specific request fields. Keys never overlap the context fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ActionParameters(BTreeMap<String, String>);

impl ActionParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Option<String>, PayloadError> {
        let key = key.into();
        if key.is_empty() {
            return Err(PayloadError::EmptyKey);
        }
        if ContextField::is_wire_key(&key) {
            return Err(PayloadError::ReservedKey(key));
        }
        Ok(self.0.insert(key, value.into()))
    }

    pub fn with(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, PayloadError> {
        self.insert(key, value)?;
        Ok(self)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    // Callers guarantee the keys are fixed, non-reserved literals.
    fn from_known(pairs: impl IntoIterator<Item = (&'static str, String)>) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect(),
        )
    }
}

/// Body sent to every action endpoint: the context fields plus the action's
/// own parameters in one flat JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestPayload {
    #[serde(flatten)]
    pub context: RequestContext,
    #[serde(flatten)]
    pub parameters: ActionParameters,
}

impl RequestPayload {
    pub fn new(context: RequestContext, parameters: ActionParameters) -> Self {
        Self {
            context,
            parameters,
        }
    }
}

/// Structured reply of an action endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationReply {
    pub status: String,
    pub message: String,
}

impl OperationReply {
    pub fn is_success(&self) -> bool {
        self.status == SUCCESS_STATUS
    }
}

/// Reply of the log endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogsReply {
    #[serde(default)]
    pub logs: Option<String>,
}

/// Day counts for the archival policy, kept as the operator typed them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecyclePolicyInput {
    pub glacier_days: String,
    pub deep_archive_days: String,
    pub expiration_days: String,
}

impl LifecyclePolicyInput {
    pub fn new(
        glacier_days: impl Into<String>,
        deep_archive_days: impl Into<String>,
        expiration_days: impl Into<String>,
    ) -> Self {
        Self {
            glacier_days: glacier_days.into(),
            deep_archive_days: deep_archive_days.into(),
            expiration_days: expiration_days.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelAction {
    CreateBucket,
    UploadFile { file_key: Option<String> },
    ApplyCustomLifecycle(LifecyclePolicyInput),
    EnableIntelligentTiering,
}

impl PanelAction {
    pub fn endpoint(&self) -> &'static str {
        match self {
            PanelAction::CreateBucket => CREATE_BUCKET_ENDPOINT,
            PanelAction::UploadFile { .. } => UPLOAD_FILE_ENDPOINT,
            PanelAction::ApplyCustomLifecycle(_) => APPLY_CUSTOM_LIFECYCLE_ENDPOINT,
            PanelAction::EnableIntelligentTiering => ENABLE_INTELLIGENT_TIERING_ENDPOINT,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PanelAction::CreateBucket => "create_bucket",
            PanelAction::UploadFile { .. } => "upload_file",
            PanelAction::ApplyCustomLifecycle(_) => "apply_custom_lifecycle",
            PanelAction::EnableIntelligentTiering => "enable_intelligent_tiering",
        }
    }

    pub fn parameters(&self) -> ActionParameters {
        match self {
            PanelAction::CreateBucket | PanelAction::EnableIntelligentTiering => {
                ActionParameters::new()
            }
            PanelAction::UploadFile { file_key } => {
                ActionParameters::from_known(file_key.clone().map(|key| ("file_key", key)))
            }
            PanelAction::ApplyCustomLifecycle(policy) => ActionParameters::from_known([
                ("glacier_days", policy.glacier_days.clone()),
                ("deep_archive_days", policy.deep_archive_days.clone()),
                ("expiration_days", policy.expiration_days.clone()),
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn payload_serializes_as_flat_object() {
        let context = RequestContext::new("AKIA", "secret", "us-east-1", "my-bucket");
        let action =
            PanelAction::ApplyCustomLifecycle(LifecyclePolicyInput::new("30", "90", "365"));
        let payload = RequestPayload::new(context, action.parameters());

        let value = serde_json::to_value(&payload).expect("serialize payload");
        assert_eq!(
            value,
            json!({
                "access_key": "AKIA",
                "secret_key": "secret",
                "region": "us-east-1",
                "bucket_name": "my-bucket",
                "glacier_days": "30",
                "deep_archive_days": "90",
                "expiration_days": "365",
            })
        );
    }

    #[test]
    fn day_counts_are_passed_through_unvalidated() {
        let action =
            PanelAction::ApplyCustomLifecycle(LifecyclePolicyInput::new("abc", "", "-1"));
        let params = action.parameters();
        assert_eq!(params.get("glacier_days"), Some("abc"));
        assert_eq!(params.get("deep_archive_days"), Some(""));
        assert_eq!(params.get("expiration_days"), Some("-1"));
    }

    #[test]
    fn parameterless_actions_send_no_extra_fields() {
        assert!(PanelAction::CreateBucket.parameters().is_empty());
        assert!(PanelAction::EnableIntelligentTiering.parameters().is_empty());
        assert!(PanelAction::UploadFile { file_key: None }.parameters().is_empty());
    }

    #[test]
    fn upload_forwards_explicit_file_key() {
        let action = PanelAction::UploadFile {
            file_key: Some("archive/report.txt".into()),
        };
        assert_eq!(action.endpoint(), UPLOAD_FILE_ENDPOINT);
        assert_eq!(action.parameters().get("file_key"), Some("archive/report.txt"));
    }

    #[test]
    fn context_keys_are_rejected_as_parameters() {
        let mut params = ActionParameters::new();
        assert_eq!(
            params.insert("bucket_name", "other"),
            Err(PayloadError::ReservedKey("bucket_name".into()))
        );
        assert_eq!(params.insert("", "x"), Err(PayloadError::EmptyKey));
        assert!(params.is_empty());
    }

    #[test]
    fn only_literal_success_counts_as_success() {
        let reply: OperationReply =
            serde_json::from_str(r#"{"status":"success","message":"ok"}"#).expect("parse");
        assert!(reply.is_success());

        for status in ["Success", "ok", "fail", "error", ""] {
            let reply = OperationReply {
                status: status.into(),
                message: String::new(),
            };
            assert!(!reply.is_success(), "{status} should not be success");
        }
    }

    #[test]
    fn reply_without_message_does_not_match_shape() {
        assert!(serde_json::from_str::<OperationReply>(r#"{"status":"success"}"#).is_err());
    }

    #[test]
    fn logs_reply_tolerates_missing_field() {
        let reply: LogsReply = serde_json::from_str("{}").expect("parse");
        assert_eq!(reply.logs, None);
    }
}
