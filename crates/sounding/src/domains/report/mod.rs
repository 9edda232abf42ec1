mod binning;
mod chart;
mod glyphs;

pub use binning::*;
pub use chart::*;
pub use glyphs::*;
