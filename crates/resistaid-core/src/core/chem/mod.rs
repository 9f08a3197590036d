//! Stateless amino-acid chemistry: residue classification, universal constant
//! tables, and whole-sequence property analysis.

pub mod classes;
pub mod properties;
pub mod tables;
