//! # Core Module
//!
//! Data models and file formats for hydrogen-bond analysis output.
//!
//! - **Data Representation** ([`models`]) - Existence matrices, identifier mappings and
//!   hydrogen-bond labels
//! - **File I/O** ([`io`]) - GROMACS `.xpm`/`.ndx` readers, mapping loaders and the
//!   NumPy `.npy` writer

pub mod io;
pub mod models;
