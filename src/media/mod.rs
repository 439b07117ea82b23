//! Media module for remote item representation and listing parsing.

pub mod item;
pub mod parser;

pub use item::RemoteItem;
pub use parser::parse_listing;
