use crate::Arbitrary;
use chrono::Weekday;
use serde::Deserialize;
use serde::Serialize;
use std::fmt::Display;
use std::fmt::Formatter;

/// the six cell colors. a cell is addressed by its color everywhere:
/// mold pools, compliance rows, the weekday service order.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Color {
    Blue = 0,
    Green = 1,
    Red = 2,
    Black = 3,
    Purple = 4,
    Orange = 5,
}

impl Color {
    pub const fn all() -> &'static [Self] {
        &[
            Self::Blue,
            Self::Green,
            Self::Red,
            Self::Black,
            Self::Purple,
            Self::Orange,
        ]
    }
    pub const fn index(&self) -> usize {
        *self as usize
    }
    /// the five colors that rotate through the weekday order.
    /// orange always serves last.
    pub const fn rotating() -> &'static [Self] {
        &[
            Self::Blue,
            Self::Green,
            Self::Red,
            Self::Black,
            Self::Purple,
        ]
    }
    /// cell service order for a given weekday. monday is
    /// blue, green, red, black, purple, orange; each later weekday
    /// shifts the rotating five left by one more position.
    pub fn weekday_order(day: Weekday) -> [Self; crate::N_CELLS] {
        let rotating = Self::rotating();
        let shift = day.num_days_from_monday() as usize % rotating.len();
        let mut order = [Self::Orange; crate::N_CELLS];
        for (i, slot) in order.iter_mut().take(rotating.len()).enumerate() {
            *slot = rotating[(i + shift) % rotating.len()];
        }
        order
    }
}

impl From<usize> for Color {
    fn from(n: usize) -> Self {
        match n {
            0 => Self::Blue,
            1 => Self::Green,
            2 => Self::Red,
            3 => Self::Black,
            4 => Self::Purple,
            5 => Self::Orange,
            _ => panic!("invalid color index"),
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Blue => "BLUE",
                Self::Green => "GREEN",
                Self::Red => "RED",
                Self::Black => "BLACK",
                Self::Purple => "PURPLE",
                Self::Orange => "ORANGE",
            }
        )
    }
}

impl TryFrom<&str> for Color {
    type Error = crate::Error;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "BLUE" => Ok(Self::Blue),
            "GREEN" => Ok(Self::Green),
            "RED" => Ok(Self::Red),
            "BLACK" => Ok(Self::Black),
            "PURPLE" => Ok(Self::Purple),
            "ORANGE" => Ok(Self::Orange),
            _ => Err(crate::Error::field("color", format!("unknown color {}", s))),
        }
    }
}

impl Arbitrary for Color {
    fn random() -> Self {
        use rand::Rng;
        Self::from(rand::rng().random_range(0..crate::N_CELLS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monday_order_starts_at_blue() {
        let order = Color::weekday_order(Weekday::Mon);
        assert!(order[0] == Color::Blue);
        assert!(order[5] == Color::Orange);
    }

    #[test]
    fn tuesday_rotates_one_left() {
        let order = Color::weekday_order(Weekday::Tue);
        assert!(order[0] == Color::Green);
        assert!(order[4] == Color::Blue);
        assert!(order[5] == Color::Orange);
    }

    #[test]
    fn orange_always_last() {
        for day in [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
        ] {
            assert!(Color::weekday_order(day)[5] == Color::Orange);
        }
    }

    #[test]
    fn every_color_served_once() {
        let order = Color::weekday_order(Weekday::Thu);
        for color in Color::all() {
            assert!(order.iter().filter(|c| *c == color).count() == 1);
        }
    }
}
