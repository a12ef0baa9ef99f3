//! Resolved schema and the read-only table descriptors handed to generators.
//!
//! A [`Schema`] is built once from a [`SchemaSpec`]. Loading fills in the
//! naming conventions for everything the document leaves out and checks that
//! every association target exists, so the [`Table`] and [`Association`]
//! handles it gives out never fail.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use tracing::debug;

use crate::config::FilterConfig;
use crate::errors::{CoreError, CoreResult};
use crate::inflector::{camelize, singularize, underscore};
use crate::specs::{AssociationKind, AssociationSpec, KeyFields, SchemaSpec, TableSpec};

/// Columns tried, in order, when a table declares no display field
const DISPLAY_FIELD_CANDIDATES: [&str; 3] = ["title", "name", "label"];

/// Fully resolved set of tables
#[derive(Debug, Clone)]
pub struct Schema {
    tables: Vec<TableData>,
    by_alias: HashMap<String, usize>,
}

#[derive(Debug, Clone)]
struct TableData {
    alias: String,
    type_name: String,
    primary_key: KeyFields,
    display_field: String,
    columns: Vec<String>,
    associations: Vec<AssociationData>,
}

#[derive(Debug, Clone)]
struct AssociationData {
    kind: AssociationKind,
    name: String,
    target: usize,
    property: String,
    foreign_key: KeyFields,
    junction_alias: Option<String>,
}

impl Schema {
    /// Resolve a schema spec, applying naming conventions
    pub fn load(spec: &SchemaSpec, config: &FilterConfig) -> CoreResult<Self> {
        let mut by_alias = HashMap::new();
        for (index, table) in spec.tables.iter().enumerate() {
            if table.alias.trim().is_empty() {
                return Err(CoreError::validation(format!(
                    "Table #{} has an empty alias",
                    index
                )));
            }
            if by_alias.insert(table.alias.clone(), index).is_some() {
                return Err(CoreError::validation(format!(
                    "Duplicate table alias '{}'",
                    table.alias
                )));
            }
        }

        let mut tables = Vec::with_capacity(spec.tables.len());
        for table in &spec.tables {
            tables.push(resolve_table(table, spec, &by_alias, config)?);
        }

        debug!(tables = tables.len(), "schema loaded");

        Ok(Self { tables, by_alias })
    }

    /// Load and resolve a schema from a YAML document
    pub fn from_yaml(yaml: &str, config: &FilterConfig) -> CoreResult<Self> {
        Self::load(&SchemaSpec::from_yaml(yaml)?, config)
    }

    /// Load and resolve a schema from a JSON document
    pub fn from_json(json: &str, config: &FilterConfig) -> CoreResult<Self> {
        Self::load(&SchemaSpec::from_json(json)?, config)
    }

    /// Load a schema file; `.json` files are read as JSON, anything else as YAML
    pub fn from_path(path: &Path, config: &FilterConfig) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json(&content, config)
        } else {
            Self::from_yaml(&content, config)
        }
    }

    /// Look up a table by alias
    pub fn table(&self, alias: &str) -> Option<Table<'_>> {
        self.by_alias.get(alias).map(|&index| Table {
            schema: self,
            index,
        })
    }

    /// Look up a table by alias, failing when it does not exist
    pub fn require(&self, alias: &str) -> CoreResult<Table<'_>> {
        self.table(alias)
            .ok_or_else(|| CoreError::table_not_found(alias))
    }

    /// All tables in declaration order
    pub fn tables(&self) -> impl Iterator<Item = Table<'_>> + '_ {
        (0..self.tables.len()).map(move |index| Table {
            schema: self,
            index,
        })
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

fn resolve_table(
    table: &TableSpec,
    spec: &SchemaSpec,
    by_alias: &HashMap<String, usize>,
    config: &FilterConfig,
) -> CoreResult<TableData> {
    let primary_key = match &table.primary_key {
        Some(pk) if !pk.is_empty() => pk.clone(),
        Some(_) => {
            return Err(CoreError::validation(format!(
                "Table '{}' declares an empty primary key",
                table.alias
            )))
        }
        None => KeyFields::from("id"),
    };

    let display_field = match &table.display_field {
        Some(field) => field.clone(),
        None => DISPLAY_FIELD_CANDIDATES
            .iter()
            .find(|candidate| table.columns.iter().any(|c| c == *candidate))
            .map(|c| c.to_string())
            .or_else(|| primary_key.first().map(str::to_string))
            .unwrap_or_default(),
    };

    let mut names = HashSet::new();
    let mut associations = Vec::with_capacity(table.associations.len());
    for assoc in &table.associations {
        if assoc.name.trim().is_empty() {
            return Err(CoreError::validation(format!(
                "Table '{}' declares an association with an empty name",
                table.alias
            )));
        }
        if !names.insert(assoc.name.as_str()) {
            return Err(CoreError::validation(format!(
                "Table '{}' declares association '{}' more than once",
                table.alias, assoc.name
            )));
        }
        associations.push(resolve_association(table, assoc, spec, by_alias)?);
    }

    Ok(TableData {
        alias: table.alias.clone(),
        type_name: table
            .type_name
            .clone()
            .unwrap_or_else(|| config.default_type_name().to_string()),
        primary_key,
        display_field,
        columns: table.columns.clone(),
        associations,
    })
}

fn resolve_association(
    source: &TableSpec,
    assoc: &AssociationSpec,
    spec: &SchemaSpec,
    by_alias: &HashMap<String, usize>,
) -> CoreResult<AssociationData> {
    let target_alias = assoc.target_alias();
    let target = *by_alias.get(target_alias).ok_or_else(|| {
        CoreError::validation(format!(
            "Association '{}' on table '{}' targets unknown table '{}'",
            assoc.name, source.alias, target_alias
        ))
    })?;
    let target_alias = spec.tables[target].alias.as_str();

    let property = assoc.property.clone().unwrap_or_else(|| {
        if assoc.kind.is_singular() {
            singularize(&underscore(&assoc.name))
        } else {
            underscore(&assoc.name)
        }
    });

    let foreign_key = assoc.foreign_key.clone().unwrap_or_else(|| {
        let owner = match assoc.kind {
            AssociationKind::BelongsTo => target_alias,
            _ => source.alias.as_str(),
        };
        KeyFields::Single(format!("{}_id", singularize(&underscore(owner))))
    });

    let junction_alias = match (assoc.kind, &assoc.through) {
        (AssociationKind::BelongsToMany, Some(through)) if through.trim().is_empty() => {
            return Err(CoreError::validation(format!(
                "Association '{}' on table '{}' has an empty junction alias",
                assoc.name, source.alias
            )))
        }
        (AssociationKind::BelongsToMany, Some(through)) => Some(through.clone()),
        (AssociationKind::BelongsToMany, None) => {
            Some(default_junction_alias(&source.alias, target_alias))
        }
        _ => None,
    };

    Ok(AssociationData {
        kind: assoc.kind,
        name: assoc.name.clone(),
        target,
        property,
        foreign_key,
        junction_alias,
    })
}

/// Junction alias used when a many-to-many association names none:
/// both aliases underscored, sorted and joined, then camelized.
pub fn default_junction_alias(source_alias: &str, target_alias: &str) -> String {
    let mut names = [underscore(source_alias), underscore(target_alias)];
    names.sort();
    camelize(&names.join("_"))
}

/// The unqualified part of a type name (`App::Model::Table::TagsTable` -> `TagsTable`)
pub fn short_type_name(type_name: &str) -> &str {
    type_name
        .rsplit(|c: char| c == ':' || c == '\\')
        .next()
        .unwrap_or(type_name)
}

/// Read-only descriptor of one table
#[derive(Debug, Clone, Copy)]
pub struct Table<'a> {
    schema: &'a Schema,
    index: usize,
}

impl<'a> Table<'a> {
    fn data(&self) -> &'a TableData {
        &self.schema.tables[self.index]
    }

    pub fn alias(&self) -> &'a str {
        &self.data().alias
    }

    /// Qualified type name of the table
    pub fn type_name(&self) -> &'a str {
        &self.data().type_name
    }

    pub fn short_type_name(&self) -> &'a str {
        short_type_name(self.type_name())
    }

    pub fn primary_key(&self) -> &'a KeyFields {
        &self.data().primary_key
    }

    pub fn display_field(&self) -> &'a str {
        &self.data().display_field
    }

    /// Column names in schema order
    pub fn columns(&self) -> &'a [String] {
        &self.data().columns
    }

    /// All declared associations in declaration order
    pub fn associations(&self) -> impl Iterator<Item = Association<'a>> + 'a {
        let schema = self.schema;
        self.data()
            .associations
            .iter()
            .map(move |data| Association { schema, data })
    }

    /// Declared associations of one kind
    pub fn associations_of(
        &self,
        kind: AssociationKind,
    ) -> impl Iterator<Item = Association<'a>> + 'a {
        self.associations().filter(move |a| a.kind() == kind)
    }
}

/// Read-only descriptor of one declared association
#[derive(Debug, Clone, Copy)]
pub struct Association<'a> {
    schema: &'a Schema,
    data: &'a AssociationData,
}

impl<'a> Association<'a> {
    pub fn kind(&self) -> AssociationKind {
        self.data.kind
    }

    pub fn name(&self) -> &'a str {
        &self.data.name
    }

    /// Entity property the associated records are exposed under
    pub fn property(&self) -> &'a str {
        &self.data.property
    }

    pub fn foreign_key(&self) -> &'a KeyFields {
        &self.data.foreign_key
    }

    pub fn target(&self) -> Table<'a> {
        Table {
            schema: self.schema,
            index: self.data.target,
        }
    }

    /// Alias of the junction table; only `BelongsToMany` associations have one
    pub fn junction_alias(&self) -> Option<&'a str> {
        self.data.junction_alias.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOG: &str = r#"
tables:
  - alias: Articles
    type: App::Model::Table::ArticlesTable
    columns: [id, title, body, author_id]
    associations:
      - kind: BelongsTo
        name: Authors
      - kind: HasMany
        name: Comments
      - kind: BelongsToMany
        name: Tags
  - alias: Authors
    type: App::Model::Table::AuthorsTable
    columns: [id, name]
  - alias: Comments
    columns: [id, body]
  - alias: Tags
    type: App\Model\Table\TagsTable
    display_field: label
    columns: [id, label]
"#;

    fn blog() -> Schema {
        Schema::from_yaml(BLOG, &FilterConfig::default()).unwrap()
    }

    #[test]
    fn test_table_defaults() {
        let schema = blog();
        assert_eq!(schema.len(), 4);

        let articles = schema.require("Articles").unwrap();
        assert_eq!(articles.short_type_name(), "ArticlesTable");
        assert_eq!(articles.primary_key().to_vec(), vec!["id".to_string()]);
        assert_eq!(articles.display_field(), "title");

        let authors = schema.require("Authors").unwrap();
        assert_eq!(authors.display_field(), "name");

        let comments = schema.require("Comments").unwrap();
        assert_eq!(comments.type_name(), "Table");
        assert_eq!(comments.display_field(), "id");

        let tags = schema.require("Tags").unwrap();
        assert_eq!(tags.short_type_name(), "TagsTable");
        assert_eq!(tags.display_field(), "label");
    }

    #[test]
    fn test_association_conventions() {
        let schema = blog();
        let articles = schema.require("Articles").unwrap();
        let assocs: Vec<_> = articles.associations().collect();

        assert_eq!(assocs[0].property(), "author");
        assert_eq!(assocs[0].foreign_key(), &KeyFields::from("author_id"));
        assert_eq!(assocs[0].target().alias(), "Authors");
        assert_eq!(assocs[0].junction_alias(), None);

        assert_eq!(assocs[1].property(), "comments");
        assert_eq!(assocs[1].foreign_key(), &KeyFields::from("article_id"));

        assert_eq!(assocs[2].property(), "tags");
        assert_eq!(assocs[2].junction_alias(), Some("ArticlesTags"));
        assert_eq!(
            articles
                .associations_of(AssociationKind::BelongsToMany)
                .count(),
            1
        );
    }

    #[test]
    fn test_default_junction_alias_is_sorted() {
        assert_eq!(default_junction_alias("Tags", "Articles"), "ArticlesTags");
        assert_eq!(default_junction_alias("Articles", "Tags"), "ArticlesTags");
        assert_eq!(default_junction_alias("Users", "UserGroups"), "UserGroupsUsers");
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name("App::Model::Table::TagsTable"), "TagsTable");
        assert_eq!(short_type_name("App\\Model\\Table\\TagsTable"), "TagsTable");
        assert_eq!(short_type_name("Table"), "Table");
    }

    #[test]
    fn test_unknown_target_is_rejected() {
        let yaml = r#"
tables:
  - alias: Articles
    associations:
      - kind: HasMany
        name: Comments
"#;
        let err = Schema::from_yaml(yaml, &FilterConfig::default()).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("unknown table 'Comments'"));
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let yaml = r#"
tables:
  - alias: Articles
    associations:
      - kind: HasMany
        name: Articles
      - kind: BelongsTo
        name: Articles
"#;
        let err = Schema::from_yaml(yaml, &FilterConfig::default()).unwrap_err();
        assert!(err.to_string().contains("more than once"));

        let yaml = "tables:\n  - alias: A\n  - alias: A\n";
        let err = Schema::from_yaml(yaml, &FilterConfig::default()).unwrap_err();
        assert!(err.to_string().contains("Duplicate table alias 'A'"));
    }

    #[test]
    fn test_require_missing_table() {
        let schema = blog();
        assert!(schema.table("Users").is_none());
        assert!(matches!(
            schema.require("Users"),
            Err(CoreError::TableNotFound { .. })
        ));
    }

    #[test]
    fn test_from_path_reads_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");
        std::fs::write(
            &path,
            r#"{"tables": [{"alias": "Tags", "columns": ["id", "name"]}]}"#,
        )
        .unwrap();

        let schema = Schema::from_path(&path, &FilterConfig::default()).unwrap();
        let tags = schema.require("Tags").unwrap();
        assert_eq!(tags.columns(), ["id".to_string(), "name".to_string()]);
        assert_eq!(schema.tables().next().unwrap().alias(), "Tags");
    }
}
