#![cfg(test)]

//! Unit tests share the integration tests' logging setup.

pub fn init() {
    movieshub_test_support::logging::init();
}
