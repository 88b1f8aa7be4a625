//! # Workflows
//!
//! End-to-end conversions from GROMACS hydrogen-bond output to `.npy` files. These are
//! the entry points the command-line interface calls.

pub mod convert;
pub mod error;
pub mod progress;
