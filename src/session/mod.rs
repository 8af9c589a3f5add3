pub mod practice;
pub mod summary;
