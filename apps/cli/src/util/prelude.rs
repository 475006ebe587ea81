pub use crate::print_output;
