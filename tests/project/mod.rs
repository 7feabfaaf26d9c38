//! Project layer tests
//!
//! Directory loading, configuration and edit batching.

pub mod tests_loading;
