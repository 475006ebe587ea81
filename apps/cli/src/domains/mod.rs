pub mod data;
pub mod generate;
pub mod sync;
