use std::fmt;

pub mod counting;

/// Part kinds of the Counting Galaxy activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GalaxyPart {
    Counting,
}

impl fmt::Display for GalaxyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GalaxyPart::Counting => f.write_str("Counting"),
        }
    }
}
