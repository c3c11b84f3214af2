use crate::Arbitrary;
use serde::Deserialize;
use serde::Serialize;
use std::fmt::Display;
use std::fmt::Formatter;

/// scheduling class. a single letter summarising cycle difficulty,
/// A lightest through E heaviest. pairing rules key off these.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Class {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
}

impl Class {
    pub const fn all() -> &'static [Self] {
        &[Self::A, Self::B, Self::C, Self::D, Self::E]
    }
    /// D and E cycles demand so much operator attention that two of
    /// them cannot share one operator
    pub const fn is_heavy(&self) -> bool {
        matches!(self, Self::D | Self::E)
    }
}

impl Display for Class {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::A => "A",
                Self::B => "B",
                Self::C => "C",
                Self::D => "D",
                Self::E => "E",
            }
        )
    }
}

impl Arbitrary for Class {
    fn random() -> Self {
        use rand::Rng;
        Self::all()[rand::rng().random_range(0..Self::all().len())]
    }
}
