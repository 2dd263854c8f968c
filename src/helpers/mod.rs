pub mod common;
pub mod distinct;
pub mod grouping;
pub mod ordering;
pub mod terminals;
