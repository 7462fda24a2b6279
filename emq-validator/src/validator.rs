//! Request validator
//!
//! Inspects one request before it is handed to the transport and rejects it
//! with the first violation found. Stateless apart from the range table, so a
//! single validator can be shared freely between callers.

use emq_core::{RangeKey, RangeTable, Result, ValidationError};
use tracing::{debug, warn};

use crate::checks::{
    check_field_range, check_list_duplicate, validate_not_empty, validate_not_none,
    validate_queue_name, validate_queue_prefix,
};
use crate::request::{
    ChangeMessageVisibilityBatchRequest, ChangeMessageVisibilityBatchRequestEntry,
    ChangeMessageVisibilityRequest, DeleteMessageBatchRequest, FieldValue, QueueAttributes,
    ReceiveMessageRequest, Request, SendMessageBatchRequest, SendMessageBatchRequestEntry,
};

const QUEUE_NAME: &str = "queue name";

#[derive(Debug, Clone, Default)]
pub struct RequestValidator {
    ranges: RangeTable,
}

impl RequestValidator {
    pub fn new(ranges: RangeTable) -> Self {
        Self { ranges }
    }

    pub fn ranges(&self) -> &RangeTable {
        &self.ranges
    }

    /// Validate exactly one request
    ///
    /// Fails with `Unknown request` when handed more than one request (or
    /// none at all).
    pub fn check_args(&self, requests: &[Request]) -> Result<()> {
        match requests {
            [request] => self.validate(request),
            _ => {
                warn!(count = requests.len(), "Expected exactly one request");
                Err(ValidationError::new("Unknown request"))
            }
        }
    }

    pub fn validate(&self, request: &Request) -> Result<()> {
        debug!(kind = request.kind(), queue = ?request.queue_name(), "Validating request");

        let result = self.check_request(request);
        if let Err(e) = &result {
            warn!(kind = request.kind(), error = %e, "Request rejected");
        }
        result
    }

    fn check_request(&self, request: &Request) -> Result<()> {
        match request {
            Request::ListQueue(r) => validate_queue_prefix(r.queue_name_prefix.as_deref()),
            Request::CreateQueue(r) => {
                validate_queue_name(r.queue_name.as_deref(), false, false, QUEUE_NAME)?;
                self.validate_queue_attributes(r.queue_attribute.as_ref())
            }
            Request::SetQueueAttributes(r) => {
                validate_name(r.queue_name.as_deref())?;
                self.validate_queue_attributes(r.queue_attribute.as_ref())
            }
            Request::SetPermission(r) => {
                validate_name(r.queue_name.as_deref())?;
                validate_not_none(r.developer_id.as_deref(), "developerId")?;
                validate_not_none(r.permission.as_ref(), "permission")?;
                Ok(())
            }
            Request::RevokePermission(r) | Request::QueryPermission(r) => {
                validate_name(r.queue_name.as_deref())?;
                validate_not_none(r.developer_id.as_deref(), "developerId")?;
                Ok(())
            }
            Request::SendMessage(r) => {
                validate_name(r.queue_name.as_deref())?;
                validate_not_none(r.message_body.as_deref(), "messageBody")?;
                Ok(())
            }
            Request::ReceiveMessage(r) => self.check_receive(r),
            Request::ChangeMessageVisibility(r) => self.check_change_visibility(r),
            Request::DeleteMessage(r) => {
                validate_name(r.queue_name.as_deref())?;
                validate_receipt_handle(r.receipt_handle.as_deref())?;
                Ok(())
            }
            Request::SendMessageBatch(r) => self.check_send_batch(r),
            Request::ChangeMessageVisibilityBatch(r) => self.check_change_visibility_batch(r),
            Request::DeleteMessageBatch(r) => check_delete_batch(r),
            Request::DeleteQueue(_)
            | Request::PurgeQueue(_)
            | Request::GetQueueInfo(_)
            | Request::ListPermissions(_) => validate_name(request.queue_name()),
        }
    }

    fn check_receive(&self, r: &ReceiveMessageRequest) -> Result<()> {
        validate_name(r.queue_name.as_deref())?;
        if let Some(number) = &r.max_receive_message_number {
            self.check_range(number, RangeKey::ReceiveMessageMaximumNumber)?;
        }
        if let Some(wait) = &r.max_receive_message_wait_seconds {
            self.check_range(wait, RangeKey::ReceiveMessageWaitSeconds)?;
        }
        Ok(())
    }

    fn check_change_visibility(&self, r: &ChangeMessageVisibilityRequest) -> Result<()> {
        validate_name(r.queue_name.as_deref())?;
        if let Some(seconds) = &r.invisibility_seconds {
            self.check_range(seconds, RangeKey::InvisibilitySeconds)?;
        }
        validate_receipt_handle(r.receipt_handle.as_deref())?;
        Ok(())
    }

    fn check_send_batch(&self, r: &SendMessageBatchRequest) -> Result<()> {
        validate_name(r.queue_name.as_deref())?;
        let entries = &r.send_message_batch_request_entry_list;
        validate_not_empty(entries, "sendMessageBatchRequestEntryList")?;

        let mut entry_ids = Vec::with_capacity(entries.len());
        for entry in entries {
            let entry_id = validate_not_none(entry.entry_id.as_deref(), "entryId")?;
            validate_not_empty(entry_id, "entryId")?;
            entry_ids.push(entry_id);
            self.check_send_entry(entry)?;
        }
        check_list_duplicate(&entry_ids, "entryId")
    }

    fn check_send_entry(&self, entry: &SendMessageBatchRequestEntry) -> Result<()> {
        validate_not_none(entry.message_body.as_deref(), "messageBody")?;
        if let Some(delay) = &entry.delay_seconds {
            self.check_range(delay, RangeKey::DelaySeconds)?;
        }
        if let Some(seconds) = &entry.invisibility_seconds {
            self.check_range(seconds, RangeKey::InvisibilitySeconds)?;
        }
        Ok(())
    }

    fn check_change_visibility_batch(
        &self,
        r: &ChangeMessageVisibilityBatchRequest,
    ) -> Result<()> {
        validate_name(r.queue_name.as_deref())?;
        let entries = &r.change_message_visibility_request_entry_list;
        validate_not_empty(entries, "changeMessageVisibilityBatchRequestEntryList")?;

        let mut handles = Vec::with_capacity(entries.len());
        for entry in entries {
            handles.push(validate_receipt_handle(entry.receipt_handle.as_deref())?);
            self.check_change_entry(entry)?;
        }
        check_list_duplicate(&handles, "receiptHandle")
    }

    fn check_change_entry(&self, entry: &ChangeMessageVisibilityBatchRequestEntry) -> Result<()> {
        let seconds =
            validate_not_none(entry.invisibility_seconds.as_ref(), "invisibilitySeconds")?;
        self.check_range(seconds, RangeKey::InvisibilitySeconds)
    }

    /// Check every attribute present in the bundle; an absent bundle is fine
    fn validate_queue_attributes(&self, attributes: Option<&QueueAttributes>) -> Result<()> {
        let Some(attrs) = attributes else {
            return Ok(());
        };

        let fields = [
            (&attrs.delay_seconds, RangeKey::DelaySeconds),
            (&attrs.invisibility_seconds, RangeKey::InvisibilitySeconds),
            (&attrs.receive_message_wait_seconds, RangeKey::ReceiveMessageWaitSeconds),
            (&attrs.receive_message_maximum_number, RangeKey::ReceiveMessageMaximumNumber),
            (&attrs.message_retention_seconds, RangeKey::MessageRetentionSeconds),
            (&attrs.message_maximum_bytes, RangeKey::MessageMaximumBytes),
            (&attrs.partition_number, RangeKey::PartitionNumber),
        ];
        for (value, key) in fields {
            if let Some(value) = value {
                self.check_range(value, key)?;
            }
        }
        Ok(())
    }

    /// Check a per-message delay against the message-level bounds
    pub fn validate_message_delay_seconds(&self, value: &FieldValue) -> Result<()> {
        self.check_range(value, RangeKey::MessageDelaySeconds)
    }

    /// Check a per-message invisibility against the message-level bounds
    pub fn validate_message_invisibility_seconds(&self, value: &FieldValue) -> Result<()> {
        self.check_range(value, RangeKey::MessageInvisibilitySeconds)
    }

    fn check_range(&self, value: &FieldValue, key: RangeKey) -> Result<()> {
        check_field_range(value, self.ranges.get(key), key.field_name())
    }
}

fn validate_name(queue_name: Option<&str>) -> Result<()> {
    validate_queue_name(queue_name, true, false, QUEUE_NAME)
}

fn validate_receipt_handle(handle: Option<&str>) -> Result<&str> {
    let handle = validate_not_none(handle, "receiptHandle")?;
    validate_not_empty(handle, "receiptHandle")?;
    Ok(handle)
}

fn check_delete_batch(r: &DeleteMessageBatchRequest) -> Result<()> {
    validate_name(r.queue_name.as_deref())?;
    let entries = &r.delete_message_batch_request_entry_list;
    validate_not_empty(entries, "deleteMessageBatchRequestEntryList")?;

    let handles = entries
        .iter()
        .map(|entry| validate_receipt_handle(entry.receipt_handle.as_deref()))
        .collect::<Result<Vec<_>>>()?;
    check_list_duplicate(&handles, "receiptHandle")
}
