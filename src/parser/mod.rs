//! Command line parsing for aws-command-guard
//!
//! Splits a raw command line into its shell pipeline segments.

pub mod pipeline;
