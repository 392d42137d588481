pub mod decoder;
pub mod encoder;
pub mod tables;

pub use decoder::read_value;
pub use encoder::{value_cost, write_value};
pub use tables::{select_entry, Code, Entry, CODE_TABLE};
