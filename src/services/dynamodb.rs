//! DynamoDB-backed `TableStore`.
//!
//! Items are converted between JSON documents and `AttributeValue` maps the
//! same way the document client does: numbers as `N`, arrays as `L`, objects
//! as `M`. Conditional writes turn "missing item" into `StoreError::NotFound`
//! rather than an upsert or a silent no-op.

use super::table_store::{
    Document, KEY_ATTRIBUTE, StoreError, StoreResult, TableStore, UpdateExpression, document_id,
};
use async_trait::async_trait;
use aws_sdk_dynamodb::{
    Client,
    error::{DisplayErrorContext, SdkError},
    operation::{delete_item::DeleteItemError, update_item::UpdateItemError},
    types::{AttributeValue, ReturnValue},
};
use serde_json::{Map, Number, Value};
use std::{collections::HashMap, error::Error as StdError};
use tracing::debug;

type Item = HashMap<String, AttributeValue>;

const KEY_PLACEHOLDER: &str = "#pk";
const ITEM_EXISTS: &str = "attribute_exists(#pk)";

#[derive(Clone)]
pub struct DynamoTableStore {
    client: Client,
}

impl DynamoTableStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn key(id: &str) -> (String, AttributeValue) {
        (KEY_ATTRIBUTE.to_string(), AttributeValue::S(id.to_string()))
    }
}

#[async_trait]
impl TableStore for DynamoTableStore {
    async fn scan(&self, table: &str) -> StoreResult<Vec<Document>> {
        let mut documents = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let output = self
                .client
                .scan()
                .table_name(table)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|err| backend_error("Scan", table, err))?;

            for item in output.items.unwrap_or_default() {
                documents.push(item_to_document(&item)?);
            }

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        debug!("scanned {} items from {}", documents.len(), table);
        Ok(documents)
    }

    async fn get(&self, table: &str, id: &str) -> StoreResult<Option<Document>> {
        let (key, value) = Self::key(id);
        let output = self
            .client
            .get_item()
            .table_name(table)
            .key(key, value)
            .send()
            .await
            .map_err(|err| backend_error("GetItem", table, err))?;

        output.item.as_ref().map(item_to_document).transpose()
    }

    async fn put(&self, table: &str, item: Document) -> StoreResult<()> {
        let id = document_id(&item).unwrap_or_default().to_string();
        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(document_to_item(&item)))
            .send()
            .await
            .map_err(|err| backend_error("PutItem", table, err))?;

        debug!("put item {} into {}", id, table);
        Ok(())
    }

    async fn update(
        &self,
        table: &str,
        id: &str,
        update: &UpdateExpression,
    ) -> StoreResult<Document> {
        let (key, value) = Self::key(id);
        let mut names = update.attribute_names();
        names.insert(KEY_PLACEHOLDER.to_string(), KEY_ATTRIBUTE.to_string());
        let values = update
            .attribute_values()
            .map(|(placeholder, value)| (placeholder, to_attribute(value)))
            .collect::<Item>();

        let output = self
            .client
            .update_item()
            .table_name(table)
            .key(key, value)
            .update_expression(update.expression())
            .condition_expression(ITEM_EXISTS)
            .set_expression_attribute_names(Some(names))
            .set_expression_attribute_values(Some(values))
            .return_values(ReturnValue::AllNew)
            .send()
            .await
            .map_err(|err| match err.into_service_error() {
                UpdateItemError::ConditionalCheckFailedException(_) => StoreError::NotFound {
                    table: table.to_string(),
                    id: id.to_string(),
                },
                other => service_error("UpdateItem", table, other),
            })?;

        match output.attributes {
            Some(attributes) => item_to_document(&attributes),
            None => Err(StoreError::NotFound {
                table: table.to_string(),
                id: id.to_string(),
            }),
        }
    }

    async fn delete(&self, table: &str, id: &str) -> StoreResult<()> {
        let (key, value) = Self::key(id);
        self.client
            .delete_item()
            .table_name(table)
            .key(key, value)
            .condition_expression(ITEM_EXISTS)
            .expression_attribute_names(KEY_PLACEHOLDER, KEY_ATTRIBUTE)
            .send()
            .await
            .map_err(|err| match err.into_service_error() {
                DeleteItemError::ConditionalCheckFailedException(_) => StoreError::NotFound {
                    table: table.to_string(),
                    id: id.to_string(),
                },
                other => service_error("DeleteItem", table, other),
            })?;

        debug!("deleted item {} from {}", id, table);
        Ok(())
    }

    async fn ping(&self, table: &str) -> StoreResult<()> {
        self.client
            .describe_table()
            .table_name(table)
            .send()
            .await
            .map_err(|err| backend_error("DescribeTable", table, err))?;
        Ok(())
    }
}

fn backend_error<E, R>(operation: &'static str, table: &str, err: SdkError<E, R>) -> StoreError
where
    E: StdError + 'static,
    R: std::fmt::Debug,
{
    StoreError::Backend {
        operation,
        table: table.to_string(),
        message: DisplayErrorContext(&err).to_string(),
    }
}

fn service_error<E>(operation: &'static str, table: &str, err: E) -> StoreError
where
    E: StdError,
{
    StoreError::Backend {
        operation,
        table: table.to_string(),
        message: DisplayErrorContext(&err).to_string(),
    }
}

/// Convert a JSON document into a DynamoDB item.
pub fn document_to_item(document: &Document) -> Item {
    document
        .iter()
        .map(|(name, value)| (name.clone(), to_attribute(value)))
        .collect()
}

/// Convert a DynamoDB item into a JSON document.
pub fn item_to_document(item: &Item) -> StoreResult<Document> {
    item.iter()
        .map(|(name, value)| Ok((name.clone(), from_attribute(value)?)))
        .collect()
}

pub fn to_attribute(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(items) => AttributeValue::L(items.iter().map(to_attribute).collect()),
        Value::Object(map) => AttributeValue::M(
            map.iter()
                .map(|(name, value)| (name.clone(), to_attribute(value)))
                .collect(),
        ),
    }
}

pub fn from_attribute(value: &AttributeValue) -> StoreResult<Value> {
    match value {
        AttributeValue::S(s) => Ok(Value::String(s.clone())),
        AttributeValue::N(n) => parse_number(n),
        AttributeValue::Bool(b) => Ok(Value::Bool(*b)),
        AttributeValue::Null(_) => Ok(Value::Null),
        AttributeValue::L(items) => items
            .iter()
            .map(from_attribute)
            .collect::<StoreResult<Vec<_>>>()
            .map(Value::Array),
        AttributeValue::M(map) => map
            .iter()
            .map(|(name, value)| Ok((name.clone(), from_attribute(value)?)))
            .collect::<StoreResult<Map<_, _>>>()
            .map(Value::Object),
        AttributeValue::Ss(set) => Ok(Value::Array(
            set.iter().cloned().map(Value::String).collect(),
        )),
        AttributeValue::Ns(set) => set
            .iter()
            .map(|n| parse_number(n))
            .collect::<StoreResult<Vec<_>>>()
            .map(Value::Array),
        other => Err(StoreError::Decode(format!(
            "unsupported attribute type: {:?}",
            other
        ))),
    }
}

fn parse_number(raw: &str) -> StoreResult<Value> {
    if let Ok(int) = raw.parse::<i64>() {
        return Ok(Value::Number(int.into()));
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| StoreError::Decode(format!("invalid number attribute `{raw}`")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn burger_document_converts_to_typed_attributes() {
        let document = json!({
            "id": "b-1",
            "price": 5.99,
            "ingredients": ["beef", "lettuce"],
            "createdAt": 1700000000000i64
        });
        let Value::Object(document) = document else {
            unreachable!()
        };

        let item = document_to_item(&document);
        assert_eq!(item["id"], AttributeValue::S("b-1".into()));
        assert_eq!(item["price"], AttributeValue::N("5.99".into()));
        assert_eq!(item["createdAt"], AttributeValue::N("1700000000000".into()));
        assert_eq!(
            item["ingredients"],
            AttributeValue::L(vec![
                AttributeValue::S("beef".into()),
                AttributeValue::S("lettuce".into())
            ])
        );
    }

    #[test]
    fn nested_order_payload_survives_a_store_round_trip() {
        let original = json!({
            "id": "o-1",
            "order": [{"burger": "b-1", "qty": 2, "extras": null}],
            "totalCost": 12.5,
            "comment": ""
        });
        let Value::Object(document) = original.clone() else {
            unreachable!()
        };

        let restored = item_to_document(&document_to_item(&document)).unwrap();
        assert_eq!(Value::Object(restored), original);
    }

    #[test]
    fn integer_numbers_stay_integers() {
        assert_eq!(parse_number("42").unwrap(), json!(42));
        assert_eq!(parse_number("-3").unwrap(), json!(-3));
        assert_eq!(parse_number("12.5").unwrap(), json!(12.5));
        assert!(parse_number("abc").is_err());
    }

    #[test]
    fn string_sets_read_as_arrays() {
        let value = from_attribute(&AttributeValue::Ss(vec!["a".into(), "b".into()])).unwrap();
        assert_eq!(value, json!(["a", "b"]));
    }

    #[test]
    fn binary_attributes_are_rejected() {
        let blob = aws_sdk_dynamodb::primitives::Blob::new(vec![1u8, 2, 3]);
        assert!(matches!(
            from_attribute(&AttributeValue::B(blob)),
            Err(StoreError::Decode(_))
        ));
    }
}
