//! Provides input/output functionality for the file formats produced and consumed
//! around `gmx hbond`.
//!
//! Text inputs share the [`traits::TextFile`] interface. Outputs are written as NumPy
//! `.npy` arrays through [`npy`].

pub mod mapping;
pub mod ndx;
pub mod npy;
pub mod resolver;
pub mod traits;
pub mod xpm;
