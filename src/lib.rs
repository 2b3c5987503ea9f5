//! # Contract tool
#![warn(missing_docs)]

pub mod cli;
