pub mod catalog;
pub mod circulation;
pub mod core;
pub mod patrons;
pub mod utils;
