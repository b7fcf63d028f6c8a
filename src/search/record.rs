//! Record types and per-record field extraction
//!
//! The engine is generic over [`Searchable`]. Two implementations ship with
//! the crate: the typed [`InventoryItem`] and the free-form [`Record`].
//! Missing fields read as empty text, never as an error.

use super::fields::FieldSet;
use crate::algorithms::normalize::{join_tokens, tokenize_vec, TokenVec};
use ahash::AHashMap;
use serde::{Deserialize, Deserializer, Serialize};
use smallvec::SmallVec;

/// Anything the engine can search
pub trait Searchable {
    /// Stable identifier
    fn id(&self) -> &str;

    /// Raw text of a field, `None` when absent
    fn field(&self, name: &str) -> Option<&str>;

    /// Name used for alphabetical ordering and suggestions
    fn display_name(&self) -> &str {
        self.field(FieldSet::NAME).unwrap_or("")
    }
}

impl<T: Searchable + ?Sized> Searchable for &T {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn field(&self, name: &str) -> Option<&str> {
        (**self).field(name)
    }

    fn display_name(&self) -> &str {
        (**self).display_name()
    }
}

/// An inventory item as delivered by the paginated fetch layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryItem {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub name: String,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
}

impl InventoryItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Searchable for InventoryItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            FieldSet::NAME => Some(&self.name),
            FieldSet::SKU => self.sku.as_deref(),
            FieldSet::CATEGORY => self.category.as_deref(),
            FieldSet::DESCRIPTION => self.description.as_deref(),
            _ => None,
        }
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Int(n) => n.to_string(),
        Id::Float(n) => n.to_string(),
    })
}

/// A free-form record: identifier plus named text fields
///
/// # Example
///
/// ```rust
/// use stocksearch::search::{Record, Searchable};
///
/// let mut record = Record::new("sku-42");
/// record.set_field("name", "Hex Bolt");
/// assert_eq!(record.field("name"), Some("Hex Bolt"));
/// assert_eq!(record.field("color"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,

    /// Field name -> value mapping
    #[serde(default)]
    pub fields: AHashMap<String, String>,
}

impl Record {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: AHashMap::new(),
        }
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Builder form of [`Record::set_field`]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_field(name, value);
        self
    }

    pub fn remove_field(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }
}

impl Searchable for Record {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// One field after normalization
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreparedField {
    /// Tokens joined by single spaces
    pub text: String,
    pub tokens: TokenVec,
}

impl PreparedField {
    pub fn new(raw: &str) -> Self {
        let tokens = tokenize_vec(raw);
        let text = join_tokens(&tokens);
        Self { text, tokens }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Character count of the text without separators
    pub fn content_len(&self) -> usize {
        self.tokens.iter().map(|t| t.chars().count()).sum()
    }
}

/// A record's searchable fields, normalized in field-set order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreparedRecord {
    pub fields: SmallVec<[PreparedField; 4]>,

    /// Lowercased display name for ordering
    pub sort_key: String,
}

impl PreparedRecord {
    /// Extract and normalize every field in `field_set` from `record`.
    pub fn new<R: Searchable + ?Sized>(record: &R, field_set: &FieldSet) -> Self {
        let fields = field_set
            .fields()
            .iter()
            .map(|spec| PreparedField::new(record.field(&spec.name).unwrap_or("")))
            .collect();
        Self {
            fields,
            sort_key: record.display_name().to_lowercase(),
        }
    }
}
