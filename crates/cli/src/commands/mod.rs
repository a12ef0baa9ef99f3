pub mod associations;
pub mod junctions;
pub mod tables;
