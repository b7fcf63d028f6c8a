//! Searchable field definitions and weights
//!
//! A [`FieldSet`] is the fixed list of fields the engine extracts from each
//! record, with the importance weight used when field scores are combined.
//! Weights only matter relative to each other.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while building a field set
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// Field set has no fields defined
    #[error("field set must have at least one field")]
    EmptySchema,

    /// Field name appears multiple times
    #[error("duplicate field name: {0}")]
    DuplicateField(String),

    /// Field validation failed
    #[error("field '{0}' validation failed: {1}")]
    InvalidField(String, String),
}

/// One searchable field and its weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name as looked up on the record
    pub name: String,

    /// Relative importance, must be positive and finite
    pub weight: f64,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }

    /// Check the name is non-empty and the weight positive and finite
    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("field name cannot be empty".to_string());
        }
        if !self.weight.is_finite() || self.weight <= 0.0 {
            return Err(format!(
                "weight must be a positive finite number, got {}",
                self.weight
            ));
        }
        Ok(())
    }
}

/// Ordered set of searchable fields
///
/// Order matters: it breaks ties between equally scored fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<FieldSpec>", into = "Vec<FieldSpec>")]
pub struct FieldSet {
    fields: Vec<FieldSpec>,
    field_map: AHashMap<String, usize>,
}

impl FieldSet {
    /// Name field, always used for display and tie-breaking
    pub const NAME: &'static str = "name";
    pub const SKU: &'static str = "sku";
    pub const CATEGORY: &'static str = "category";
    pub const DESCRIPTION: &'static str = "description";

    pub fn builder() -> FieldSetBuilder {
        FieldSetBuilder::new()
    }

    /// Inventory item fields: name 10, sku 8, category 5, description 3.
    pub fn inventory() -> Self {
        let fields = vec![
            FieldSpec::new(Self::NAME, 10.0),
            FieldSpec::new(Self::SKU, 8.0),
            FieldSpec::new(Self::CATEGORY, 5.0),
            FieldSpec::new(Self::DESCRIPTION, 3.0),
        ];
        let field_map = fields
            .iter()
            .enumerate()
            .map(|(idx, f)| (f.name.clone(), idx))
            .collect();
        Self { fields, field_map }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.field_map.get(name).map(|&idx| &self.fields[idx])
    }

    /// Position of a field, which is also its tie-break rank
    pub fn position(&self, name: &str) -> Option<usize> {
        self.field_map.get(name).copied()
    }

    pub fn weight(&self, name: &str) -> Option<f64> {
        self.get(name).map(|f| f.weight)
    }

    /// Copy with some weights replaced; unknown names are ignored
    pub fn with_weights(&self, overrides: &AHashMap<String, f64>) -> Result<Self, SchemaError> {
        let mut builder = Self::builder();
        for spec in &self.fields {
            let weight = overrides.get(&spec.name).copied().unwrap_or(spec.weight);
            builder = builder.field(spec.name.clone(), weight);
        }
        builder.build()
    }
}

impl Default for FieldSet {
    fn default() -> Self {
        Self::inventory()
    }
}

impl TryFrom<Vec<FieldSpec>> for FieldSet {
    type Error = SchemaError;

    fn try_from(fields: Vec<FieldSpec>) -> Result<Self, Self::Error> {
        FieldSetBuilder { fields }.build()
    }
}

impl From<FieldSet> for Vec<FieldSpec> {
    fn from(set: FieldSet) -> Self {
        set.fields
    }
}

/// Builder for [`FieldSet`]
#[derive(Debug, Default)]
pub struct FieldSetBuilder {
    fields: Vec<FieldSpec>,
}

impl FieldSetBuilder {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn field(mut self, name: impl Into<String>, weight: f64) -> Self {
        self.fields.push(FieldSpec::new(name, weight));
        self
    }

    /// Validate and freeze the field set
    pub fn build(self) -> Result<FieldSet, SchemaError> {
        if self.fields.is_empty() {
            return Err(SchemaError::EmptySchema);
        }

        let mut field_map = AHashMap::with_capacity(self.fields.len());
        for (idx, field) in self.fields.iter().enumerate() {
            field
                .validate()
                .map_err(|e| SchemaError::InvalidField(field.name.clone(), e))?;
            if field_map.insert(field.name.clone(), idx).is_some() {
                return Err(SchemaError::DuplicateField(field.name.clone()));
            }
        }

        Ok(FieldSet {
            fields: self.fields,
            field_map,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inventory_weights_ordered() {
        let set = FieldSet::inventory();
        assert_eq!(set.len(), 4);
        let names: Vec<&str> = set.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["name", "sku", "category", "description"]);
        assert!(set.weight("name") > set.weight("sku"));
        assert!(set.weight("category") > set.weight("description"));
        assert_eq!(set.position("category"), Some(2));
        assert_eq!(set.weight("color"), None);
    }

    #[test]
    fn test_builder_rejects_empty() {
        assert_eq!(FieldSet::builder().build().unwrap_err(), SchemaError::EmptySchema);
    }

    #[test]
    fn test_builder_rejects_duplicates() {
        let err = FieldSet::builder()
            .field("name", 1.0)
            .field("name", 2.0)
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaError::DuplicateField("name".into()));
    }

    #[test]
    fn test_builder_rejects_bad_weights() {
        for weight in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = FieldSet::builder().field("name", weight).build().unwrap_err();
            assert!(matches!(err, SchemaError::InvalidField(ref n, _) if n == "name"));
        }
        let err = FieldSet::builder().field("", 1.0).build().unwrap_err();
        assert!(matches!(err, SchemaError::InvalidField(..)));
    }

    #[test]
    fn test_with_weights_override() {
        let mut overrides = AHashMap::new();
        overrides.insert("description".to_string(), 9.0);
        overrides.insert("unknown".to_string(), 1.0);
        let set = FieldSet::inventory().with_weights(&overrides).unwrap();
        assert_eq!(set.weight("description"), Some(9.0));
        assert_eq!(set.weight("name"), Some(10.0));
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn test_serde_validates() {
        let set: FieldSet =
            serde_json::from_str(r#"[{"name":"name","weight":4},{"name":"sku","weight":2}]"#)
                .unwrap();
        assert_eq!(set.weight("sku"), Some(2.0));

        let bad = serde_json::from_str::<FieldSet>(r#"[{"name":"name","weight":-4}]"#);
        assert!(bad.is_err());
    }
}
