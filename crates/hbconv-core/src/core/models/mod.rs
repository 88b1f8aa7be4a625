pub mod label;
pub mod mapping;
pub mod matrix;
