pub mod hbond;
