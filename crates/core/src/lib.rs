pub mod config;
pub mod errors;
pub mod inflector;
pub mod schema;
pub mod specs;

// Re-export key types for convenience
pub use config::{ConfigError, ConfigSource, ConfigTrait, FilterConfig, LoggingConfig};
pub use errors::{CoreError, CoreResult, ScaffoldError};
pub use schema::{Association, Schema, Table};
pub use specs::{AssociationKind, AssociationSpec, KeyFields, SchemaSpec, TableSpec};
