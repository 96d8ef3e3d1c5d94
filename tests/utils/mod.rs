pub mod builders;
pub mod mocks;
pub mod setup;

// Re-export main utilities for use by test files
pub use builders::GameRequestBuilder;
#[allow(unused_imports)]
pub use mocks::FlakyGameStore;
pub use setup::{TestSetup, TestSetupBuilder};
