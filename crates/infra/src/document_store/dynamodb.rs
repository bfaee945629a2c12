//! DynamoDB-backed product store.
//!
//! Table layout: partition key `category` (S), sort key `name` (S), `price`
//! stored as a number. Extra product attributes are mapped to native
//! DynamoDB attribute values.

use std::collections::HashMap;

use aws_config::SdkConfig;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue;
use serde_json::{Map as JsonMap, Number as JsonNumber, Value as JsonValue};

use catalog_products::product::{CATEGORY_ATTRIBUTE, NAME_ATTRIBUTE, PRICE_ATTRIBUTE};
use catalog_products::{Condition, Product, ProductKey, ProductQuery};

use super::r#trait::{ProductStore, StoreError};
use crate::aws::{SdkFailure, classify_sdk_error};

type Item = HashMap<String, AttributeValue>;

/// Product store over a single DynamoDB table.
#[derive(Debug, Clone)]
pub struct DynamoDbProductStore {
    client: Client,
    table_name: String,
}

impl DynamoDbProductStore {
    pub fn new(config: &SdkConfig, table_name: impl Into<String>) -> Self {
        Self::from_client(Client::new(config), table_name)
    }

    pub fn from_client(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

fn map_sdk_error<E, R>(op: &str, err: aws_sdk_dynamodb::error::SdkError<E, R>) -> StoreError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match classify_sdk_error(err) {
        SdkFailure::Construction(msg) => StoreError::Misconfigured(format!("{op}: {msg}")),
        SdkFailure::Service(msg) => StoreError::Rejected(format!("{op}: {msg}")),
        SdkFailure::Transport(msg) => StoreError::Unavailable(format!("{op}: {msg}")),
    }
}

#[async_trait::async_trait]
impl ProductStore for DynamoDbProductStore {
    async fn load(&self, key: &ProductKey) -> Result<Option<Product>, StoreError> {
        let out = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(CATEGORY_ATTRIBUTE, AttributeValue::S(key.category().to_string()))
            .key(NAME_ATTRIBUTE, AttributeValue::S(key.name().to_string()))
            .send()
            .await
            .map_err(|e| map_sdk_error("get_item", e))?;

        // GetItem answers with no item (not an error) for an absent key.
        out.item.map(product_from_item).transpose()
    }

    async fn put(&self, product: Product) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item_from_product(&product)))
            .send()
            .await
            .map_err(|e| map_sdk_error("put_item", e))?;
        Ok(())
    }

    async fn delete(&self, key: &ProductKey) -> Result<(), StoreError> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key(CATEGORY_ATTRIBUTE, AttributeValue::S(key.category().to_string()))
            .key(NAME_ATTRIBUTE, AttributeValue::S(key.name().to_string()))
            .send()
            .await
            .map_err(|e| map_sdk_error("delete_item", e))?;
        Ok(())
    }

    async fn query(&self, query: &ProductQuery) -> Result<Vec<Product>, StoreError> {
        let expr = QueryExpression::from_query(query);

        let products = collect_pages(|start_key| {
            let request = self
                .client
                .query()
                .table_name(&self.table_name)
                .key_condition_expression(expr.key_condition.clone())
                .set_filter_expression(expr.filter.clone())
                .set_expression_attribute_names(Some(expr.names.clone()))
                .set_expression_attribute_values(Some(expr.values.clone()))
                .set_exclusive_start_key(start_key);
            async move {
                let out = request
                    .send()
                    .await
                    .map_err(|e| map_sdk_error("query", e))?;
                Ok(Page {
                    items: out.items.unwrap_or_default(),
                    last_evaluated_key: out.last_evaluated_key,
                })
            }
        })
        .await?;

        tracing::debug!(
            table = %self.table_name,
            category = query.category(),
            filters = query.conditions().len(),
            returned = products.len(),
            "dynamodb query exhausted"
        );

        Ok(products)
    }

    fn backend(&self) -> &'static str {
        "dynamodb"
    }
}

/// One page of a Query response.
#[derive(Debug, Default)]
pub(crate) struct Page {
    pub items: Vec<Item>,
    pub last_evaluated_key: Option<Item>,
}

/// Drive `fetch` until the store stops handing out a continuation key.
///
/// `fetch` receives the previous page's `last_evaluated_key` (`None` for the
/// first page). Items are decoded in page order.
pub(crate) async fn collect_pages<F, Fut>(mut fetch: F) -> Result<Vec<Product>, StoreError>
where
    F: FnMut(Option<Item>) -> Fut,
    Fut: Future<Output = Result<Page, StoreError>>,
{
    let mut products = Vec::new();
    let mut start_key: Option<Item> = None;

    loop {
        let page = fetch(start_key.take()).await?;

        for item in page.items {
            products.push(product_from_item(item)?);
        }

        match page.last_evaluated_key {
            Some(key) if !key.is_empty() => start_key = Some(key),
            _ => break,
        }
    }

    Ok(products)
}

/// Query request parts rendered from a `ProductQuery`.
///
/// The category goes into the key condition; every other condition becomes
/// part of the filter expression, evaluated by the service after the
/// partition has been read.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct QueryExpression {
    pub key_condition: String,
    pub filter: Option<String>,
    pub names: HashMap<String, String>,
    pub values: Item,
}

impl QueryExpression {
    pub(crate) fn from_query(query: &ProductQuery) -> Self {
        // Attribute names go through placeholders; `name` is a reserved word.
        let mut names = HashMap::new();
        let mut values = HashMap::new();

        names.insert(format!("#{CATEGORY_ATTRIBUTE}"), CATEGORY_ATTRIBUTE.to_string());
        values.insert(
            format!(":{CATEGORY_ATTRIBUTE}"),
            AttributeValue::S(query.category().to_string()),
        );
        let key_condition = format!("#{CATEGORY_ATTRIBUTE} = :{CATEGORY_ATTRIBUTE}");

        let mut clauses = Vec::new();
        for condition in query.conditions() {
            let attr = condition.attribute();
            names.insert(format!("#{attr}"), attr.to_string());
            match condition {
                Condition::NameEquals(name) => {
                    values.insert(format!(":{attr}"), AttributeValue::S(name.clone()));
                    clauses.push(format!("#{attr} = :{attr}"));
                }
                Condition::PriceAtMost(max) => {
                    values.insert(format!(":{attr}"), AttributeValue::N(max.to_string()));
                    clauses.push(format!("#{attr} <= :{attr}"));
                }
            }
        }

        let filter = if clauses.is_empty() {
            None
        } else {
            Some(clauses.join(" AND "))
        };

        Self {
            key_condition,
            filter,
            names,
            values,
        }
    }
}

pub(crate) fn item_from_product(product: &Product) -> Item {
    let mut item: Item = product
        .attributes
        .iter()
        .map(|(k, v)| (k.clone(), attribute_from_json(v)))
        .collect();

    item.insert(
        CATEGORY_ATTRIBUTE.to_string(),
        AttributeValue::S(product.category.clone()),
    );
    item.insert(NAME_ATTRIBUTE.to_string(), AttributeValue::S(product.name.clone()));
    item.insert(
        PRICE_ATTRIBUTE.to_string(),
        AttributeValue::N(product.price.to_string()),
    );
    item
}

pub(crate) fn product_from_item(mut item: Item) -> Result<Product, StoreError> {
    let category = take_string(&mut item, CATEGORY_ATTRIBUTE)?;
    let name = take_string(&mut item, NAME_ATTRIBUTE)?;
    let price = match item.remove(PRICE_ATTRIBUTE) {
        Some(AttributeValue::N(n)) => n
            .parse::<f64>()
            .map_err(|e| StoreError::Malformed(format!("price {n:?}: {e}")))?,
        Some(other) => {
            return Err(StoreError::Malformed(format!(
                "price has unexpected type: {other:?}"
            )));
        }
        None => 0.0,
    };

    let attributes = item
        .into_iter()
        .map(|(k, v)| json_from_attribute(v).map(|json| (k, json)))
        .collect::<Result<_, _>>()?;

    Ok(Product {
        category,
        name,
        price,
        attributes,
    })
}

fn take_string(item: &mut Item, attr: &str) -> Result<String, StoreError> {
    match item.remove(attr) {
        Some(AttributeValue::S(s)) => Ok(s),
        Some(other) => Err(StoreError::Malformed(format!(
            "{attr} has unexpected type: {other:?}"
        ))),
        None => Err(StoreError::Malformed(format!("{attr} missing"))),
    }
}

fn attribute_from_json(value: &JsonValue) -> AttributeValue {
    match value {
        JsonValue::Null => AttributeValue::Null(true),
        JsonValue::Bool(b) => AttributeValue::Bool(*b),
        JsonValue::Number(n) => AttributeValue::N(n.to_string()),
        JsonValue::String(s) => AttributeValue::S(s.clone()),
        JsonValue::Array(items) => AttributeValue::L(items.iter().map(attribute_from_json).collect()),
        JsonValue::Object(map) => AttributeValue::M(
            map.iter()
                .map(|(k, v)| (k.clone(), attribute_from_json(v)))
                .collect(),
        ),
    }
}

fn json_from_attribute(value: AttributeValue) -> Result<JsonValue, StoreError> {
    Ok(match value {
        AttributeValue::Null(_) => JsonValue::Null,
        AttributeValue::Bool(b) => JsonValue::Bool(b),
        AttributeValue::N(n) => JsonValue::Number(parse_number(&n)?),
        AttributeValue::S(s) => JsonValue::String(s),
        AttributeValue::Ss(items) => JsonValue::Array(items.into_iter().map(JsonValue::String).collect()),
        AttributeValue::Ns(items) => JsonValue::Array(
            items
                .iter()
                .map(|n| parse_number(n).map(JsonValue::Number))
                .collect::<Result<_, _>>()?,
        ),
        AttributeValue::L(items) => JsonValue::Array(
            items
                .into_iter()
                .map(json_from_attribute)
                .collect::<Result<_, _>>()?,
        ),
        AttributeValue::M(map) => JsonValue::Object(
            map.into_iter()
                .map(|(k, v)| json_from_attribute(v).map(|json| (k, json)))
                .collect::<Result<JsonMap<_, _>, _>>()?,
        ),
        other => {
            return Err(StoreError::Malformed(format!(
                "unsupported attribute type: {other:?}"
            )));
        }
    })
}

fn parse_number(n: &str) -> Result<JsonNumber, StoreError> {
    if let Ok(i) = n.parse::<i64>() {
        return Ok(i.into());
    }
    if let Ok(u) = n.parse::<u64>() {
        return Ok(u.into());
    }
    n.parse::<f64>()
        .ok()
        .and_then(JsonNumber::from_f64)
        .ok_or_else(|| StoreError::Malformed(format!("number {n:?} is not representable")))
}
