mod fetch_latest;

pub use fetch_latest::*;
