pub mod recommendations;
pub mod similarity;

pub use recommendations::{recommend, DEFAULT_RECOMMENDATIONS};
