pub mod filter;
pub mod generator;
pub mod templates;
pub mod writer;

pub use filter::*;
pub use generator::*;
pub use templates::{render_association_map, render_controller_contain, OutputFormat};
pub use writer::*;
