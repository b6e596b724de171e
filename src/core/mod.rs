pub mod harness;
pub mod runtime;
pub mod suites;
