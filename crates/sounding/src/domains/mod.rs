mod observations;
mod report;
mod stations;

pub use observations::*;
pub use report::*;
pub use stations::*;
