//! Request model
//!
//! Requests are built by the calling application and inspected read-only by
//! the validator. Every field is optional because documents decoded from the
//! wire may leave any of them out; absence is itself something the validator
//! reports on.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A numeric field as supplied by the caller
///
/// Only `Integer` is acceptable to the service. The other shapes exist so a
/// decoded document carrying `2.5` or `"10"` is reported as a wrong data type
/// instead of failing to decode. Integer literals too large for `i64` are kept
/// as `BigInteger` so they are reported as out of range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged, from = "WireValue")]
pub enum FieldValue {
    Integer(i64),
    BigInteger(serde_json::Number),
    Float(f64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireValue {
    Number(serde_json::Number),
    Text(String),
}

impl From<WireValue> for FieldValue {
    fn from(value: WireValue) -> Self {
        match value {
            WireValue::Number(n) => {
                if let Some(v) = n.as_i64() {
                    Self::Integer(v)
                } else if n.is_f64() {
                    Self::Float(n.as_f64().unwrap_or(f64::NAN))
                } else {
                    Self::BigInteger(n)
                }
            }
            WireValue::Text(s) => Self::Text(s),
        }
    }
}

impl FieldValue {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            Self::BigInteger(_) | Self::Float(_) | Self::Text(_) => None,
        }
    }

    /// Whether the value was written as a whole number, whatever its size
    pub fn is_integral(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::BigInteger(_))
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::BigInteger(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<u32> for FieldValue {
    fn from(v: u32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

/// Access rights a developer can be granted on a queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    None,
    ChangeMessageVisibility,
    ReceiveMessage,
    SendMessage,
    DeleteMessage,
    GetQueueInfo,
    Full,
}

// =============================================================================
// QUEUE REQUESTS
// =============================================================================

/// Optional queue attribute bundle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_seconds: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invisibility_seconds: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receive_message_wait_seconds: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receive_message_maximum_number: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_retention_seconds: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_maximum_bytes: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition_number: Option<FieldValue>,
}

impl QueueAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn delay_seconds(mut self, v: impl Into<FieldValue>) -> Self {
        self.delay_seconds = Some(v.into());
        self
    }

    #[must_use]
    pub fn invisibility_seconds(mut self, v: impl Into<FieldValue>) -> Self {
        self.invisibility_seconds = Some(v.into());
        self
    }

    #[must_use]
    pub fn receive_message_wait_seconds(mut self, v: impl Into<FieldValue>) -> Self {
        self.receive_message_wait_seconds = Some(v.into());
        self
    }

    #[must_use]
    pub fn receive_message_maximum_number(mut self, v: impl Into<FieldValue>) -> Self {
        self.receive_message_maximum_number = Some(v.into());
        self
    }

    #[must_use]
    pub fn message_retention_seconds(mut self, v: impl Into<FieldValue>) -> Self {
        self.message_retention_seconds = Some(v.into());
        self
    }

    #[must_use]
    pub fn message_maximum_bytes(mut self, v: impl Into<FieldValue>) -> Self {
        self.message_maximum_bytes = Some(v.into());
        self
    }

    #[must_use]
    pub fn partition_number(mut self, v: impl Into<FieldValue>) -> Self {
        self.partition_number = Some(v.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQueueRequest {
    pub queue_name_prefix: Option<String>,
}

impl ListQueueRequest {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            queue_name_prefix: Some(prefix.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQueueRequest {
    pub queue_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_attribute: Option<QueueAttributes>,
}

impl CreateQueueRequest {
    pub fn new(queue_name: impl Into<String>) -> Self {
        Self {
            queue_name: Some(queue_name.into()),
            queue_attribute: None,
        }
    }

    #[must_use]
    pub fn with_attributes(mut self, attributes: QueueAttributes) -> Self {
        self.queue_attribute = Some(attributes);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetQueueAttributesRequest {
    pub queue_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_attribute: Option<QueueAttributes>,
}

impl SetQueueAttributesRequest {
    pub fn new(queue_name: impl Into<String>) -> Self {
        Self {
            queue_name: Some(queue_name.into()),
            queue_attribute: None,
        }
    }

    #[must_use]
    pub fn with_attributes(mut self, attributes: QueueAttributes) -> Self {
        self.queue_attribute = Some(attributes);
        self
    }
}

/// Request that names a queue and nothing else
///
/// Shared by delete, purge, get-info and list-permissions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueNameRequest {
    pub queue_name: Option<String>,
}

impl QueueNameRequest {
    pub fn new(queue_name: impl Into<String>) -> Self {
        Self {
            queue_name: Some(queue_name.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPermissionRequest {
    pub queue_name: Option<String>,
    pub developer_id: Option<String>,
    pub permission: Option<Permission>,
}

impl SetPermissionRequest {
    pub fn new(
        queue_name: impl Into<String>,
        developer_id: impl Into<String>,
        permission: Permission,
    ) -> Self {
        Self {
            queue_name: Some(queue_name.into()),
            developer_id: Some(developer_id.into()),
            permission: Some(permission),
        }
    }
}

/// Revoke or query the permission of one developer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperPermissionRequest {
    pub queue_name: Option<String>,
    pub developer_id: Option<String>,
}

impl DeveloperPermissionRequest {
    pub fn new(queue_name: impl Into<String>, developer_id: impl Into<String>) -> Self {
        Self {
            queue_name: Some(queue_name.into()),
            developer_id: Some(developer_id.into()),
        }
    }
}

// =============================================================================
// MESSAGE REQUESTS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub queue_name: Option<String>,
    pub message_body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_seconds: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invisibility_seconds: Option<FieldValue>,
}

impl SendMessageRequest {
    pub fn new(queue_name: impl Into<String>, message_body: impl Into<String>) -> Self {
        Self {
            queue_name: Some(queue_name.into()),
            message_body: Some(message_body.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiveMessageRequest {
    pub queue_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_receive_message_number: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_receive_message_wait_seconds: Option<FieldValue>,
}

impl ReceiveMessageRequest {
    pub fn new(queue_name: impl Into<String>) -> Self {
        Self {
            queue_name: Some(queue_name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn max_receive_message_number(mut self, v: impl Into<FieldValue>) -> Self {
        self.max_receive_message_number = Some(v.into());
        self
    }

    #[must_use]
    pub fn max_receive_message_wait_seconds(mut self, v: impl Into<FieldValue>) -> Self {
        self.max_receive_message_wait_seconds = Some(v.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeMessageVisibilityRequest {
    pub queue_name: Option<String>,
    pub receipt_handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invisibility_seconds: Option<FieldValue>,
}

impl ChangeMessageVisibilityRequest {
    pub fn new(queue_name: impl Into<String>, receipt_handle: impl Into<String>) -> Self {
        Self {
            queue_name: Some(queue_name.into()),
            receipt_handle: Some(receipt_handle.into()),
            invisibility_seconds: None,
        }
    }

    #[must_use]
    pub fn invisibility_seconds(mut self, v: impl Into<FieldValue>) -> Self {
        self.invisibility_seconds = Some(v.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteMessageRequest {
    pub queue_name: Option<String>,
    pub receipt_handle: Option<String>,
}

impl DeleteMessageRequest {
    pub fn new(queue_name: impl Into<String>, receipt_handle: impl Into<String>) -> Self {
        Self {
            queue_name: Some(queue_name.into()),
            receipt_handle: Some(receipt_handle.into()),
        }
    }
}

// =============================================================================
// BATCH REQUESTS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageBatchRequestEntry {
    pub entry_id: Option<String>,
    pub message_body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_seconds: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invisibility_seconds: Option<FieldValue>,
}

impl SendMessageBatchRequestEntry {
    pub fn new(entry_id: impl Into<String>, message_body: impl Into<String>) -> Self {
        Self {
            entry_id: Some(entry_id.into()),
            message_body: Some(message_body.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn delay_seconds(mut self, v: impl Into<FieldValue>) -> Self {
        self.delay_seconds = Some(v.into());
        self
    }

    #[must_use]
    pub fn invisibility_seconds(mut self, v: impl Into<FieldValue>) -> Self {
        self.invisibility_seconds = Some(v.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageBatchRequest {
    pub queue_name: Option<String>,
    #[serde(default)]
    pub send_message_batch_request_entry_list: Vec<SendMessageBatchRequestEntry>,
}

impl SendMessageBatchRequest {
    pub fn new(
        queue_name: impl Into<String>,
        entries: impl IntoIterator<Item = SendMessageBatchRequestEntry>,
    ) -> Self {
        Self {
            queue_name: Some(queue_name.into()),
            send_message_batch_request_entry_list: entries.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeMessageVisibilityBatchRequestEntry {
    pub receipt_handle: Option<String>,
    pub invisibility_seconds: Option<FieldValue>,
}

impl ChangeMessageVisibilityBatchRequestEntry {
    pub fn new(
        receipt_handle: impl Into<String>,
        invisibility_seconds: impl Into<FieldValue>,
    ) -> Self {
        Self {
            receipt_handle: Some(receipt_handle.into()),
            invisibility_seconds: Some(invisibility_seconds.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeMessageVisibilityBatchRequest {
    pub queue_name: Option<String>,
    #[serde(default)]
    pub change_message_visibility_request_entry_list:
        Vec<ChangeMessageVisibilityBatchRequestEntry>,
}

impl ChangeMessageVisibilityBatchRequest {
    pub fn new(
        queue_name: impl Into<String>,
        entries: impl IntoIterator<Item = ChangeMessageVisibilityBatchRequestEntry>,
    ) -> Self {
        Self {
            queue_name: Some(queue_name.into()),
            change_message_visibility_request_entry_list: entries.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteMessageBatchRequestEntry {
    pub receipt_handle: Option<String>,
}

impl DeleteMessageBatchRequestEntry {
    pub fn new(receipt_handle: impl Into<String>) -> Self {
        Self {
            receipt_handle: Some(receipt_handle.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteMessageBatchRequest {
    pub queue_name: Option<String>,
    #[serde(default)]
    pub delete_message_batch_request_entry_list: Vec<DeleteMessageBatchRequestEntry>,
}

impl DeleteMessageBatchRequest {
    pub fn new(
        queue_name: impl Into<String>,
        entries: impl IntoIterator<Item = DeleteMessageBatchRequestEntry>,
    ) -> Self {
        Self {
            queue_name: Some(queue_name.into()),
            delete_message_batch_request_entry_list: entries.into_iter().collect(),
        }
    }
}

// =============================================================================
// REQUEST
// =============================================================================

/// Every request the client can send, tagged by kind
///
/// Decodes from `{"type": "<Kind>", ...fields}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    ListQueue(ListQueueRequest),
    CreateQueue(CreateQueueRequest),
    DeleteQueue(QueueNameRequest),
    PurgeQueue(QueueNameRequest),
    GetQueueInfo(QueueNameRequest),
    SetQueueAttributes(SetQueueAttributesRequest),
    SetPermission(SetPermissionRequest),
    RevokePermission(DeveloperPermissionRequest),
    QueryPermission(DeveloperPermissionRequest),
    ListPermissions(QueueNameRequest),
    SendMessage(SendMessageRequest),
    ReceiveMessage(ReceiveMessageRequest),
    ChangeMessageVisibility(ChangeMessageVisibilityRequest),
    DeleteMessage(DeleteMessageRequest),
    SendMessageBatch(SendMessageBatchRequest),
    ChangeMessageVisibilityBatch(ChangeMessageVisibilityBatchRequest),
    DeleteMessageBatch(DeleteMessageBatchRequest),
}

impl Request {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ListQueue(_) => "ListQueue",
            Self::CreateQueue(_) => "CreateQueue",
            Self::DeleteQueue(_) => "DeleteQueue",
            Self::PurgeQueue(_) => "PurgeQueue",
            Self::GetQueueInfo(_) => "GetQueueInfo",
            Self::SetQueueAttributes(_) => "SetQueueAttributes",
            Self::SetPermission(_) => "SetPermission",
            Self::RevokePermission(_) => "RevokePermission",
            Self::QueryPermission(_) => "QueryPermission",
            Self::ListPermissions(_) => "ListPermissions",
            Self::SendMessage(_) => "SendMessage",
            Self::ReceiveMessage(_) => "ReceiveMessage",
            Self::ChangeMessageVisibility(_) => "ChangeMessageVisibility",
            Self::DeleteMessage(_) => "DeleteMessage",
            Self::SendMessageBatch(_) => "SendMessageBatch",
            Self::ChangeMessageVisibilityBatch(_) => "ChangeMessageVisibilityBatch",
            Self::DeleteMessageBatch(_) => "DeleteMessageBatch",
        }
    }

    /// Queue name, or the name prefix for `ListQueue`
    pub fn queue_name(&self) -> Option<&str> {
        match self {
            Self::ListQueue(r) => r.queue_name_prefix.as_deref(),
            Self::CreateQueue(r) => r.queue_name.as_deref(),
            Self::DeleteQueue(r)
            | Self::PurgeQueue(r)
            | Self::GetQueueInfo(r)
            | Self::ListPermissions(r) => r.queue_name.as_deref(),
            Self::SetQueueAttributes(r) => r.queue_name.as_deref(),
            Self::SetPermission(r) => r.queue_name.as_deref(),
            Self::RevokePermission(r) | Self::QueryPermission(r) => r.queue_name.as_deref(),
            Self::SendMessage(r) => r.queue_name.as_deref(),
            Self::ReceiveMessage(r) => r.queue_name.as_deref(),
            Self::ChangeMessageVisibility(r) => r.queue_name.as_deref(),
            Self::DeleteMessage(r) => r.queue_name.as_deref(),
            Self::SendMessageBatch(r) => r.queue_name.as_deref(),
            Self::ChangeMessageVisibilityBatch(r) => r.queue_name.as_deref(),
            Self::DeleteMessageBatch(r) => r.queue_name.as_deref(),
        }
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.queue_name() {
            Some(name) => write!(f, "{}({name})", self.kind()),
            None => f.write_str(self.kind()),
        }
    }
}

macro_rules! impl_from_request {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Request {
                fn from(r: $ty) -> Self {
                    Self::$variant(r)
                }
            }
        )*
    };
}

impl_from_request! {
    ListQueueRequest => ListQueue,
    CreateQueueRequest => CreateQueue,
    SetQueueAttributesRequest => SetQueueAttributes,
    SetPermissionRequest => SetPermission,
    SendMessageRequest => SendMessage,
    ReceiveMessageRequest => ReceiveMessage,
    ChangeMessageVisibilityRequest => ChangeMessageVisibility,
    DeleteMessageRequest => DeleteMessage,
    SendMessageBatchRequest => SendMessageBatch,
    ChangeMessageVisibilityBatchRequest => ChangeMessageVisibilityBatch,
    DeleteMessageBatchRequest => DeleteMessageBatch,
}
