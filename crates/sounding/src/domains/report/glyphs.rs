use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const BLANK: char = ' ';

#[derive(Debug, Error, PartialEq)]
#[error("glyph set needs exactly 4 characters, got {0}")]
pub struct GlyphError(pub usize);

/// Characters used to paint one chart row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyphs {
    /// Coldest and warmest bin of a row
    pub start_stop: char,
    /// Filler between the extremes
    pub range: char,
    /// A bin holding at least one station
    pub data: char,
    /// The bin holding the row mean
    pub mean: char,
}

impl Default for Glyphs {
    fn default() -> Self {
        Glyphs {
            start_stop: '%',
            range: '.',
            data: ':',
            mean: '#',
        }
    }
}

impl FromStr for Glyphs {
    type Err = GlyphError;

    /// Parses `start_stop`, `range`, `data`, `mean` in that order, e.g. `"%.:#"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.chars().collect();
        match chars.as_slice() {
            &[start_stop, range, data, mean] => Ok(Glyphs {
                start_stop,
                range,
                data,
                mean,
            }),
            other => Err(GlyphError(other.len())),
        }
    }
}

impl fmt::Display for Glyphs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}{}", self.start_stop, self.range, self.data, self.mean)
    }
}
