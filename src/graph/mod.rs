//! Graph layer — relationship store, same-type traversal, Mega policy.

pub mod mega;
pub mod store;
pub mod traversal;
