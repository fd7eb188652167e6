//! Miscellaneous common structs used throughout the library.

mod finger_table;
mod id;
mod key_range;
mod node;

pub use finger_table::*;
pub use id::*;
pub use key_range::*;
pub use node::*;
