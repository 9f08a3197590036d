pub mod candidate;
pub mod mutation;
