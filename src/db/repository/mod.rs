//! Table-scoped database operations on the local store.

mod preference;

pub use preference::*;
