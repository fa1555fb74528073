pub mod decomposition;
pub mod precision;
