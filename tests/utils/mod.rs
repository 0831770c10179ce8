pub mod actions;
pub mod assertions;
pub mod mocks;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use actions::settle;
#[allow(unused_imports)]
pub use mocks::{HangingPlayer, ReentrantPlayer};
#[allow(unused_imports)]
pub use setup::{Peer, TestSetup, TestSetupBuilder};
