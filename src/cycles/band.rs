use serde::Deserialize;
use serde::Serialize;
use std::fmt::Display;
use std::fmt::Formatter;

/// wire-diameter band. boundaries are inclusive at 4 for fine and
/// inclusive at 8 for coarse.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Fine,
    Mid,
    Coarse,
}

impl Band {
    pub fn of(wire: f32) -> Self {
        if wire <= 4.0 {
            Self::Fine
        } else if wire < 8.0 {
            Self::Mid
        } else {
            Self::Coarse
        }
    }
}

impl Display for Band {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Fine => "<=4",
                Self::Mid => ">4<8",
                Self::Coarse => ">=8",
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_are_inclusive() {
        assert!(Band::of(4.0) == Band::Fine);
        assert!(Band::of(4.01) == Band::Mid);
        assert!(Band::of(7.99) == Band::Mid);
        assert!(Band::of(8.0) == Band::Coarse);
    }
}
