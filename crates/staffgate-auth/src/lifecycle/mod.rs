//! Account verification lifecycle.

pub mod machine;

pub use machine::{LifecycleEvent, transition};
