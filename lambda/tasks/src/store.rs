//! Key-value persistence over the DynamoDB task table.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;

use crate::error::{DeleteError, PutError, StoreError};
use crate::task::{Record, KEY_ATTRIBUTE};

/// Raw record persistence: one table, one key attribute, per-key atomicity
/// provided by the backing medium's conditional writes.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetches every record in one pass. No cursor state survives the call.
    async fn scan_all(&self) -> Result<Vec<Record>, StoreError>;

    /// Writes `record` under `key` unless a record with that key exists.
    async fn put_if_absent(&self, key: &str, record: Record) -> Result<(), PutError>;

    /// Deletes the record under `key` if present.
    async fn delete_by_key(&self, key: &str) -> Result<(), DeleteError>;
}

pub struct DynamoRecordStore {
    client: Client,
    table_name: String,
}

impl DynamoRecordStore {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }
}

#[async_trait]
impl RecordStore for DynamoRecordStore {
    async fn scan_all(&self) -> Result<Vec<Record>, StoreError> {
        let mut records = Vec::new();
        let mut start_key = None;

        // DynamoDB pages scan output; follow LastEvaluatedKey to the end.
        loop {
            let output = self
                .client
                .scan()
                .table_name(&self.table_name)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|err| StoreError::new(err.to_string()))?;

            records.extend(output.items.unwrap_or_default());
            start_key = output.last_evaluated_key;
            if start_key.is_none() {
                break;
            }
        }

        Ok(records)
    }

    async fn put_if_absent(&self, key: &str, record: Record) -> Result<(), PutError> {
        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(record))
            .condition_expression(format!("attribute_not_exists({KEY_ATTRIBUTE})"))
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_conditional_check_failed_exception()) =>
            {
                tracing::debug!(key, "conditional put rejected, record exists");
                Err(PutError::AlreadyExists)
            }
            Err(err) => Err(PutError::Store(StoreError::new(err.to_string()))),
        }
    }

    async fn delete_by_key(&self, key: &str) -> Result<(), DeleteError> {
        let result = self
            .client
            .delete_item()
            .table_name(&self.table_name)
            .key(KEY_ATTRIBUTE, AttributeValue::S(key.to_string()))
            .condition_expression(format!("attribute_exists({KEY_ATTRIBUTE})"))
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_conditional_check_failed_exception()) =>
            {
                Err(DeleteError::NotFound)
            }
            Err(err) => Err(DeleteError::Store(StoreError::new(err.to_string()))),
        }
    }
}
