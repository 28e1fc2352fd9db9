//! Test support shared by the movieshub integration tests: logging
//! initialization and assertions on the error contract.

pub mod logging;
pub mod problem_details;
