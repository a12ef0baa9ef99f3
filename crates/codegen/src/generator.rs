use indexmap::IndexSet;
use scaffold_core::inflector::underscore;
use scaffold_core::{FilterConfig, Schema, ScaffoldError};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::filter::{AssociationFilter, AssociationMap};
use crate::templates::{render_association_map, render_controller_contain, OutputFormat};
use crate::writer::CodeWriter;

/// Drives association filtering over a loaded schema
pub struct AssociationGenerator {
    schema: Schema,
    filter: AssociationFilter,
    writer: CodeWriter,
}

impl AssociationGenerator {
    pub fn new(schema: Schema, filter: AssociationFilter) -> Self {
        Self {
            schema,
            filter,
            writer: CodeWriter::new(),
        }
    }

    /// Load a schema file and filter with `config`
    pub fn from_path(path: &Path, config: FilterConfig) -> Result<Self, ScaffoldError> {
        let schema = Schema::from_path(path, &config)?;
        Ok(Self::new(schema, AssociationFilter::new(config)))
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn filter(&self) -> &AssociationFilter {
        &self.filter
    }

    pub fn associations(&self, table: &str) -> Result<AssociationMap, ScaffoldError> {
        let table = self.schema.require(table)?;
        Ok(self.filter.build_association_map(&table))
    }

    pub fn junction_aliases(&self, table: &str) -> Result<IndexSet<String>, ScaffoldError> {
        let table = self.schema.require(table)?;
        Ok(self.filter.junction_aliases(&table))
    }

    pub fn filter_has_many_aliases<S: AsRef<str>>(
        &self,
        table: &str,
        aliases: &[S],
    ) -> Result<Vec<String>, ScaffoldError> {
        let table = self.schema.require(table)?;
        Ok(self.filter.filter_has_many_aliases(&table, aliases))
    }

    pub fn render(&self, table: &str, format: OutputFormat) -> Result<String, ScaffoldError> {
        render_association_map(&self.associations(table)?, format)
    }

    pub fn render_contain(&self, table: &str) -> Result<String, ScaffoldError> {
        render_controller_contain(table, &self.associations(table)?)
    }

    /// Render one table's association map into `path`; returns whether the file changed
    pub fn generate(
        &self,
        table: &str,
        format: OutputFormat,
        path: &Path,
    ) -> Result<bool, ScaffoldError> {
        let content = self.render(table, format)?;
        let written = self.writer.write_if_changed(path, &content)?;
        info!(table, path = %path.display(), written, "association map generated");
        Ok(written)
    }

    /// Render every table into `output_dir` as `<table>.associations.<ext>`
    pub fn generate_all(
        &self,
        output_dir: &Path,
        format: OutputFormat,
    ) -> Result<Vec<PathBuf>, ScaffoldError> {
        let mut written = Vec::new();

        for table in self.schema.tables() {
            let path = output_dir.join(format!(
                "{}.associations.{}",
                underscore(table.alias()),
                format.extension()
            ));
            if self.generate(table.alias(), format, &path)? {
                written.push(path);
            }
        }

        Ok(written)
    }
}
