pub mod bag;
pub mod reader;

pub use bag::{positional_key, AttributeBag};
pub use reader::read_groups;
