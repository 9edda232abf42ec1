mod domains;
pub mod units;
mod utils;

pub use domains::*;
pub use utils::*;
