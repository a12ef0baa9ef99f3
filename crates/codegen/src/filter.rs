//! Association filtering for generated scaffolding.
//!
//! Generators only want the associations a controller or template can use
//! directly. A `HasMany` onto the junction table of a `BelongsToMany` is
//! already covered by the many-to-many association, and a specialized table
//! pointing at its own type would generate a relation to itself, so both are
//! dropped before the association map is built.

use std::fmt;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use scaffold_core::inflector;
use scaffold_core::{AssociationKind, FilterConfig, KeyFields, Table};

/// Predicate deciding whether a table is of the generic table type
pub type GenericTablePredicate = Arc<dyn Fn(&Table<'_>) -> bool + Send + Sync>;

/// Normalized description of one association, as consumed by templates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociationRecord {
    pub property: String,
    pub variable: String,
    pub primary_key: Vec<String>,
    pub display_field: String,
    pub foreign_key: KeyFields,
    pub alias: String,
    pub controller: String,
    pub fields: Vec<String>,
}

/// Association records grouped by kind, then keyed by association name.
///
/// Kinds appear in [`AssociationKind::ALL`] order and only when they hold at
/// least one record. Names keep the order they were declared in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AssociationMap {
    groups: IndexMap<AssociationKind, IndexMap<String, AssociationRecord>>,
}

impl AssociationMap {
    fn insert(&mut self, kind: AssociationKind, name: &str, record: AssociationRecord) {
        self.groups
            .entry(kind)
            .or_default()
            .insert(name.to_string(), record);
    }

    /// Records of one kind
    pub fn get(&self, kind: AssociationKind) -> Option<&IndexMap<String, AssociationRecord>> {
        self.groups.get(&kind)
    }

    pub fn record(&self, kind: AssociationKind, name: &str) -> Option<&AssociationRecord> {
        self.get(kind).and_then(|records| records.get(name))
    }

    /// Kinds present in the map, in grouping order
    pub fn kinds(&self) -> impl Iterator<Item = AssociationKind> + '_ {
        self.groups.keys().copied()
    }

    /// Every record with its kind and name, in grouping order
    pub fn iter(&self) -> impl Iterator<Item = (AssociationKind, &str, &AssociationRecord)> + '_ {
        self.groups.iter().flat_map(|(kind, records)| {
            records
                .iter()
                .map(move |(name, record)| (*kind, name.as_str(), record))
        })
    }

    /// Total number of records
    pub fn len(&self) -> usize {
        self.groups.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Filters a table's declared associations down to the ones worth generating
#[derive(Clone, Default)]
pub struct AssociationFilter {
    config: FilterConfig,
    generic_predicate: Option<GenericTablePredicate>,
}

impl fmt::Debug for AssociationFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssociationFilter")
            .field("config", &self.config)
            .field("custom_generic_predicate", &self.generic_predicate.is_some())
            .finish()
    }
}

impl AssociationFilter {
    pub fn new(config: FilterConfig) -> Self {
        Self {
            config,
            generic_predicate: None,
        }
    }

    /// Replace the generic-table check.
    ///
    /// By default a table is generic when its short type name is listed in
    /// [`FilterConfig::generic_table_types`].
    pub fn with_generic_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Table<'_>) -> bool + Send + Sync + 'static,
    {
        self.generic_predicate = Some(Arc::new(predicate));
        self
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Whether the table is an instance of the generic table type
    pub fn is_generic_table(&self, table: &Table<'_>) -> bool {
        match &self.generic_predicate {
            Some(predicate) => predicate(table),
            None => self.config.is_generic_type_name(table.short_type_name()),
        }
    }

    /// Junction aliases of every `BelongsToMany` association, in declaration order
    pub fn junction_aliases(&self, table: &Table<'_>) -> IndexSet<String> {
        table
            .associations_of(AssociationKind::BelongsToMany)
            .filter_map(|assoc| assoc.junction_alias())
            .map(str::to_string)
            .collect()
    }

    /// Drop every alias that names a junction table of `table`.
    ///
    /// The remaining aliases keep their relative order.
    pub fn filter_has_many_aliases<S: AsRef<str>>(
        &self,
        table: &Table<'_>,
        aliases: &[S],
    ) -> Vec<String> {
        let junctions = self.junction_aliases(table);
        aliases
            .iter()
            .map(AsRef::as_ref)
            .filter(|alias| !junctions.contains(*alias))
            .map(str::to_string)
            .collect()
    }

    /// Build the association map of `table`
    pub fn build_association_map(&self, table: &Table<'_>) -> AssociationMap {
        let junctions = self.junction_aliases(table);
        let source_is_generic = self.is_generic_table(table);
        let mut map = AssociationMap::default();

        for kind in AssociationKind::ALL {
            for assoc in table.associations_of(kind) {
                let target = assoc.target();
                let name = assoc.name();
                let alias = target.alias();

                if kind == AssociationKind::HasMany && junctions.contains(alias) {
                    debug!(
                        table = table.alias(),
                        association = name,
                        "skipping has-many onto a junction table"
                    );
                    continue;
                }

                if !source_is_generic && target.type_name() == table.type_name() {
                    debug!(
                        table = table.alias(),
                        association = name,
                        "skipping self-referencing association"
                    );
                    continue;
                }

                let record = AssociationRecord {
                    property: assoc.property().to_string(),
                    variable: inflector::variable(name),
                    primary_key: target.primary_key().to_vec(),
                    display_field: target.display_field().to_string(),
                    foreign_key: assoc.foreign_key().clone(),
                    alias: alias.to_string(),
                    controller: self.controller_name(&target),
                    fields: target.columns().to_vec(),
                };
                trace!(table = table.alias(), %kind, association = name, "association kept");
                map.insert(kind, name, record);
            }
        }

        map
    }

    /// Controller name for a target table.
    ///
    /// The configured suffix is stripped from the short type name. Generic
    /// tables, and names with nothing left after stripping, use the target's
    /// alias instead.
    pub fn controller_name(&self, target: &Table<'_>) -> String {
        let short = target.short_type_name();
        let name = short
            .strip_suffix(self.config.table_suffix.as_str())
            .unwrap_or(short);

        if name.is_empty() || self.is_generic_table(target) {
            target.alias().to_string()
        } else {
            name.to_string()
        }
    }
}
