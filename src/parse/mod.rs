pub mod split;
pub mod types;

pub use split::split_commands;
pub use types::{Operator, ParsedCommand};
