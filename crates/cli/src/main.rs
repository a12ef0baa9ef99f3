mod commands;
mod logging;

use anyhow::Context;
use clap::{Parser, Subcommand};
use scaffold_codegen::{AssociationGenerator, OutputFormat};
use scaffold_core::{ConfigTrait, FilterConfig, LoggingConfig};
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(name = "scaffold")]
#[command(about = "Association metadata for scaffold code generation", version)]
struct Cli {
    /// Short type name treated as the generic table type (repeatable).
    /// Overrides SCAFFOLD_GENERIC_TABLE_TYPES.
    #[arg(long = "generic-type", global = true)]
    generic_types: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the filtered association map of a table
    Associations {
        /// Schema document (YAML, or JSON with a .json extension)
        schema: PathBuf,

        /// Table alias
        table: String,

        /// Output format
        #[arg(long, short, default_value = "yaml")]
        format: OutputFormat,

        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Write the association map of every table into a directory
    GenerateAll {
        schema: PathBuf,

        /// Output directory
        #[arg(long, short, default_value = "associations")]
        output: PathBuf,

        #[arg(long, short, default_value = "yaml")]
        format: OutputFormat,
    },

    /// List the junction aliases of a table's many-to-many associations
    Junctions {
        schema: PathBuf,
        table: String,
    },

    /// Remove junction aliases from a list of has-many aliases
    FilterHasMany {
        schema: PathBuf,
        table: String,

        /// Candidate has-many aliases
        aliases: Vec<String>,
    },

    /// Print the contain list a generated controller uses
    Contain {
        schema: PathBuf,
        table: String,
    },

    /// List the tables of a schema document
    Tables {
        schema: PathBuf,
    },
}

impl Commands {
    fn schema(&self) -> &PathBuf {
        match self {
            Commands::Associations { schema, .. }
            | Commands::GenerateAll { schema, .. }
            | Commands::Junctions { schema, .. }
            | Commands::FilterHasMany { schema, .. }
            | Commands::Contain { schema, .. }
            | Commands::Tables { schema } => schema,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logging_config = LoggingConfig::from_env()?;
    logging::init_logging(&logging_config)?;

    let mut filter_config = FilterConfig::from_env()?;
    if !cli.generic_types.is_empty() {
        filter_config.generic_table_types = cli.generic_types.clone();
    }

    let schema_path = cli.command.schema();
    let generator = AssociationGenerator::from_path(schema_path, filter_config)
        .with_context(|| format!("Failed to load schema {}", schema_path.display()))?;
    debug!(
        tables = generator.schema().len(),
        config = ?generator.filter().config(),
        "schema ready"
    );

    match cli.command {
        Commands::Associations {
            table,
            format,
            output,
            ..
        } => {
            commands::associations::show(&generator, &table, format, output.as_deref())?;
        }
        Commands::GenerateAll { output, format, .. } => {
            commands::associations::generate_all(&generator, &output, format)?;
        }
        Commands::Junctions { table, .. } => {
            commands::junctions::list(&generator, &table)?;
        }
        Commands::FilterHasMany { table, aliases, .. } => {
            commands::junctions::filter_has_many(&generator, &table, &aliases)?;
        }
        Commands::Contain { table, .. } => {
            commands::associations::contain(&generator, &table)?;
        }
        Commands::Tables { .. } => {
            commands::tables::list(&generator);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_associations() {
        let cli = Cli::try_parse_from([
            "scaffold",
            "associations",
            "schema.yaml",
            "Articles",
            "--format",
            "json",
            "--generic-type",
            "Table",
        ])
        .unwrap();

        assert_eq!(cli.generic_types, vec!["Table"]);
        match cli.command {
            Commands::Associations {
                schema,
                table,
                format,
                output,
            } => {
                assert_eq!(schema, PathBuf::from("schema.yaml"));
                assert_eq!(table, "Articles");
                assert_eq!(format, OutputFormat::Json);
                assert!(output.is_none());
            }
            _ => panic!("expected associations command"),
        }
    }

    #[test]
    fn test_parse_filter_has_many() {
        let cli = Cli::try_parse_from([
            "scaffold",
            "filter-has-many",
            "schema.yaml",
            "Articles",
            "ArticlesTags",
            "Comments",
        ])
        .unwrap();

        assert_eq!(cli.command.schema(), &PathBuf::from("schema.yaml"));
        match cli.command {
            Commands::FilterHasMany { aliases, .. } => {
                assert_eq!(aliases, vec!["ArticlesTags", "Comments"]);
            }
            _ => panic!("expected filter-has-many command"),
        }
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let result = Cli::try_parse_from([
            "scaffold",
            "associations",
            "schema.yaml",
            "Articles",
            "--format",
            "toml",
        ]);
        assert!(result.is_err());
    }
}
