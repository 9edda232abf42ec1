mod attribute;
mod collection;
mod station;

pub use attribute::*;
pub use collection::*;
pub use station::*;
