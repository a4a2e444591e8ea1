//! Shared utilities.
//!
//! Test doubles for the process and download seams.

#[cfg(test)]
pub mod testutil;
