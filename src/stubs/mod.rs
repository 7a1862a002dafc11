//! Delayed, recording fakes of the compiler and runner seams for tests.
pub mod compiler;
pub mod runner;
