//! Infrastructure layer - store connection and state assembly.

pub mod state;
