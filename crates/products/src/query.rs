//! Search filter over a single category.
//!
//! A query always carries the key condition `category == <category>`; the
//! optional name and price predicates are narrowing filters applied to every
//! item of that partition. Stores can only use the partition key for the
//! lookup itself, so a filtered search still reads the whole partition.

use catalog_core::{DomainError, DomainResult};

use crate::product::{NAME_ATTRIBUTE, PRICE_ATTRIBUTE, Product};

/// A post-filter predicate applied after the partition lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `name == value`
    NameEquals(String),
    /// `price <= value`
    PriceAtMost(f64),
}

impl Condition {
    /// Attribute the condition reads.
    pub fn attribute(&self) -> &'static str {
        match self {
            Condition::NameEquals(_) => NAME_ATTRIBUTE,
            Condition::PriceAtMost(_) => PRICE_ATTRIBUTE,
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Condition::NameEquals(name) => product.name == *name,
            Condition::PriceAtMost(max) => product.price <= *max,
        }
    }
}

/// Conjunctive product search: key condition plus zero or more filters.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    category: String,
    conditions: Vec<Condition>,
}

impl ProductQuery {
    /// Build the filter from the optional search parameters.
    ///
    /// An empty `name` is treated as absent. A non-finite `price` (`NaN`,
    /// `inf`) is not a valid bound and fails validation.
    pub fn new(
        category: impl Into<String>,
        name: Option<&str>,
        price: Option<f64>,
    ) -> DomainResult<Self> {
        if let Some(price) = price.filter(|p| !p.is_finite()) {
            return Err(DomainError::validation(format!(
                "price must be a finite number, got {price}"
            )));
        }

        let mut conditions = Vec::new();

        if let Some(name) = name.filter(|n| !n.is_empty()) {
            conditions.push(Condition::NameEquals(name.to_string()));
        }
        if let Some(price) = price {
            conditions.push(Condition::PriceAtMost(price));
        }

        Ok(Self {
            category: category.into(),
            conditions,
        })
    }

    /// Partition key value the query is restricted to.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Filter conditions, in the order they were added.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Whether `product` satisfies the key condition and every filter.
    pub fn matches(&self, product: &Product) -> bool {
        product.category == self.category && self.conditions.iter().all(|c| c.matches(product))
    }
}
