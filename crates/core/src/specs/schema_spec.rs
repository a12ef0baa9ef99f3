use serde::{Deserialize, Serialize};
use std::fmt;

/// Schema document describing tables and their declared associations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaSpec {
    #[serde(default)]
    pub tables: Vec<TableSpec>,
}

impl SchemaSpec {
    /// Create a schema spec from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Create a schema spec from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Convert schema spec to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Find a table spec by alias
    pub fn table(&self, alias: &str) -> Option<&TableSpec> {
        self.tables.iter().find(|t| t.alias == alias)
    }
}

/// Table specification as declared by the metadata layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableSpec {
    pub alias: String,
    /// Qualified type name of the table (`App::Model::Table::ArticlesTable`).
    /// Tables without one are instances of the generic table type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<KeyFields>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_field: Option<String>,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub associations: Vec<AssociationSpec>,
}

/// Association declared on a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationSpec {
    pub kind: AssociationKind,
    pub name: String,
    /// Alias of the target table; defaults to the association name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<KeyFields>,
    /// Junction alias for `BelongsToMany` associations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub through: Option<String>,
}

impl AssociationSpec {
    pub fn new(kind: AssociationKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            target: None,
            property: None,
            foreign_key: None,
            through: None,
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_foreign_key(mut self, foreign_key: impl Into<KeyFields>) -> Self {
        self.foreign_key = Some(foreign_key.into());
        self
    }

    pub fn through(mut self, junction: impl Into<String>) -> Self {
        self.through = Some(junction.into());
        self
    }

    /// Alias of the target table
    pub fn target_alias(&self) -> &str {
        self.target.as_deref().unwrap_or(&self.name)
    }
}

/// Kind of association between two tables.
///
/// Declaration order is the order in which association maps are grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AssociationKind {
    #[serde(alias = "belongs_to", alias = "belongsTo")]
    BelongsTo,
    #[serde(alias = "has_one", alias = "hasOne")]
    HasOne,
    #[serde(alias = "has_many", alias = "hasMany")]
    HasMany,
    #[serde(alias = "belongs_to_many", alias = "belongsToMany")]
    BelongsToMany,
}

impl AssociationKind {
    /// All kinds, in grouping order
    pub const ALL: [AssociationKind; 4] = [
        AssociationKind::BelongsTo,
        AssociationKind::HasOne,
        AssociationKind::HasMany,
        AssociationKind::BelongsToMany,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AssociationKind::BelongsTo => "BelongsTo",
            AssociationKind::HasOne => "HasOne",
            AssociationKind::HasMany => "HasMany",
            AssociationKind::BelongsToMany => "BelongsToMany",
        }
    }

    /// Returns true if the association points at a single record
    pub fn is_singular(self) -> bool {
        matches!(self, Self::BelongsTo | Self::HasOne)
    }
}

impl fmt::Display for AssociationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One or more key columns.
///
/// Documents may give a single column name or a list; both shapes are kept
/// as declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyFields {
    Single(String),
    Composite(Vec<String>),
}

impl KeyFields {
    /// The key columns as a list, whatever the declared shape
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            KeyFields::Single(field) => vec![field.clone()],
            KeyFields::Composite(fields) => fields.clone(),
        }
    }

    pub fn first(&self) -> Option<&str> {
        match self {
            KeyFields::Single(field) => Some(field),
            KeyFields::Composite(fields) => fields.first().map(String::as_str),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            KeyFields::Single(field) => field.is_empty(),
            KeyFields::Composite(fields) => fields.is_empty(),
        }
    }
}

impl From<&str> for KeyFields {
    fn from(field: &str) -> Self {
        KeyFields::Single(field.to_string())
    }
}

impl From<String> for KeyFields {
    fn from(field: String) -> Self {
        KeyFields::Single(field)
    }
}

impl From<Vec<String>> for KeyFields {
    fn from(fields: Vec<String>) -> Self {
        KeyFields::Composite(fields)
    }
}

impl From<Vec<&str>> for KeyFields {
    fn from(fields: Vec<&str>) -> Self {
        KeyFields::Composite(fields.into_iter().map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
tables:
  - alias: Articles
    type: App::Model::Table::ArticlesTable
    primary_key: id
    columns: [id, title, author_id]
    associations:
      - kind: BelongsTo
        name: Authors
      - kind: belongs_to_many
        name: Tags
        through: ArticlesTags
  - alias: ArticlesTags
    primary_key: [article_id, tag_id]
"#;

    #[test]
    fn test_schema_spec_from_yaml() {
        let spec = SchemaSpec::from_yaml(YAML).unwrap();
        assert_eq!(spec.tables.len(), 2);

        let articles = spec.table("Articles").unwrap();
        assert_eq!(
            articles.type_name.as_deref(),
            Some("App::Model::Table::ArticlesTable")
        );
        assert_eq!(articles.primary_key, Some(KeyFields::from("id")));
        assert_eq!(articles.associations[0].kind, AssociationKind::BelongsTo);
        assert_eq!(articles.associations[0].target_alias(), "Authors");
        assert_eq!(articles.associations[1].kind, AssociationKind::BelongsToMany);
        assert_eq!(articles.associations[1].through.as_deref(), Some("ArticlesTags"));

        let junction = spec.table("ArticlesTags").unwrap();
        assert_eq!(
            junction.primary_key.as_ref().map(KeyFields::to_vec),
            Some(vec!["article_id".to_string(), "tag_id".to_string()])
        );
        assert!(junction.type_name.is_none());
        assert!(junction.columns.is_empty());
    }

    #[test]
    fn test_schema_spec_json_round_trip() {
        let spec = SchemaSpec::from_yaml(YAML).unwrap();
        let json = spec.to_json().unwrap();
        assert!(json.contains("\"type\": \"App::Model::Table::ArticlesTable\""));
        assert_eq!(SchemaSpec::from_json(&json).unwrap(), spec);
    }

    #[test]
    fn test_association_kind_order() {
        let mut kinds = vec![
            AssociationKind::BelongsToMany,
            AssociationKind::HasMany,
            AssociationKind::BelongsTo,
            AssociationKind::HasOne,
        ];
        kinds.sort();
        assert_eq!(kinds, AssociationKind::ALL.to_vec());
        assert_eq!(AssociationKind::HasMany.to_string(), "HasMany");
        assert!(AssociationKind::HasOne.is_singular());
        assert!(!AssociationKind::BelongsToMany.is_singular());
    }

    #[test]
    fn test_key_fields_coercion() {
        assert_eq!(KeyFields::from("id").to_vec(), vec!["id".to_string()]);
        assert_eq!(KeyFields::from(vec!["a", "b"]).first(), Some("a"));
        assert!(KeyFields::Composite(Vec::new()).is_empty());
    }
}
