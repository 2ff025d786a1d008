pub mod catalog;
pub mod cli;
pub mod generator;
pub mod image;
pub mod program;

pub use generator::run;
