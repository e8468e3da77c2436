//! People CLI - run basic MongoDB document operations from the command line.
//!
//! This crate provides the `people` binary: a demo that runs every example
//! operation in a fixed order, plus one subcommand per operation.

pub mod cli;
pub mod commands;
pub mod config;
pub mod demo;
pub mod error;
pub mod logging;
pub mod output;
