pub mod affordability;
pub mod catalog;
pub mod simulate;
