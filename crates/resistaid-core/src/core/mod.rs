pub mod chem;
pub mod models;
pub mod retrieval;
