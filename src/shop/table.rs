use super::color::Color;
use crate::Arbitrary;
use serde::Deserialize;
use serde::Serialize;
use std::fmt::Display;
use std::fmt::Formatter;

/// which of the two production surfaces in a cell
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    One = 0,
    Two = 1,
}

impl Side {
    pub const fn all() -> &'static [Self] {
        &[Self::One, Self::Two]
    }
    pub const fn other(&self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }
    pub const fn index(&self) -> usize {
        *self as usize
    }
}

/// one of the twelve tables on the floor, e.g. RED_1.
/// operators name tables this way on the daily sheet, so the
/// text form is part of the input contract.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TableId {
    pub color: Color,
    pub side: Side,
}

impl TableId {
    pub const fn new(color: Color, side: Side) -> Self {
        Self { color, side }
    }
    pub const fn counterpart(&self) -> Self {
        Self {
            color: self.color,
            side: self.side.other(),
        }
    }
}

impl Display for TableId {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}_{}",
            self.color,
            match self.side {
                Side::One => 1,
                Side::Two => 2,
            }
        )
    }
}

impl From<TableId> for String {
    fn from(id: TableId) -> Self {
        id.to_string()
    }
}

impl TryFrom<&str> for TableId {
    type Error = crate::Error;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let (color, side) = s
            .rsplit_once('_')
            .ok_or_else(|| crate::Error::field("table", format!("malformed table name {}", s)))?;
        let color = Color::try_from(color)?;
        let side = match side {
            "1" => Side::One,
            "2" => Side::Two,
            _ => {
                return Err(crate::Error::field(
                    "table",
                    format!("table side must be 1 or 2, got {}", side),
                ));
            }
        };
        Ok(Self { color, side })
    }
}

impl TryFrom<String> for TableId {
    type Error = crate::Error;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::try_from(s.as_str())
    }
}

impl Arbitrary for TableId {
    fn random() -> Self {
        use rand::Rng;
        Self {
            color: Color::random(),
            side: if rand::rng().random_range(0..2) == 0 {
                Side::One
            } else {
                Side::Two
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_all_twelve_names() {
        for color in Color::all() {
            for side in Side::all() {
                let id = TableId::new(*color, *side);
                let name = id.to_string();
                assert!(TableId::try_from(name.as_str()).unwrap() == id);
            }
        }
    }

    #[test]
    fn counterpart_flips_side_only() {
        let id = TableId::try_from("RED_1").unwrap();
        assert!(id.counterpart() == TableId::try_from("RED_2").unwrap());
        assert!(id.counterpart().counterpart() == id);
    }

    #[test]
    fn rejects_unknown_names() {
        assert!(TableId::try_from("RED_3").is_err());
        assert!(TableId::try_from("MAUVE_1").is_err());
        assert!(TableId::try_from("RED1").is_err());
    }
}
