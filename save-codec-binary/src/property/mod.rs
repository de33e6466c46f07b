//! The property codec: header/body dispatch, text, struct dispatch, and
//! the `None`-terminated property list.

pub mod body;
pub mod list;
pub mod structs;
pub mod text;

pub use list::{read_property_list, write_property_list};
