pub mod character;
pub mod core_api;
pub mod direction;
pub mod fields;
pub mod fx;
pub mod item;
pub mod layout;
pub mod reader;
pub mod tables;
pub mod unknowns;
pub mod writer;
