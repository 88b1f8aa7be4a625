//! # hbconv Core Library
//!
//! Converts the output of GROMACS hydrogen-bond analysis (`gmx hbond`) into plain
//! NumPy arrays that downstream analysis code can load without any GROMACS tooling.
//!
//! ## Architecture
//!
//! - **[`core`]: The Foundation.** Stateless data models (`ExistenceMatrix`,
//!   `IdentifierMapping`, `HBondLabel`) and the text/binary format readers and writers
//!   (`XpmFile`, `NdxFile`, `IdentifierResolver`, the `.npy` writer).
//!
//! - **[`workflows`]: The Public API.** File-to-file conversions that tie the readers
//!   and writers together, report progress, and guarantee that a failed conversion leaves
//!   no partial output behind.

pub mod core;
pub mod workflows;
