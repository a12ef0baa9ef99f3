pub mod schema_spec;

pub use schema_spec::*;
