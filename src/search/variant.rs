use serde::Deserialize;
use serde::Serialize;
use std::fmt::Display;
use std::fmt::Formatter;

/// how a method's next pick lands on a table. every method runs under
/// each enabled variant, and the comparator sees them all.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// pick the job, then the best table for it
    JobFirst,
    /// walk the tables in weekday order, each taking its best job
    TableFirst,
    /// place whole fixture groups back to back for the zero setups
    FixtureFirst,
}

impl Variant {
    pub const fn all() -> &'static [Self] {
        &[Self::JobFirst, Self::TableFirst, Self::FixtureFirst]
    }
}

impl Display for Variant {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::JobFirst => "job-first",
                Self::TableFirst => "table-first",
                Self::FixtureFirst => "fixture-first",
            }
        )
    }
}

impl TryFrom<&str> for Variant {
    type Error = crate::Error;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "job" | "job-first" => Ok(Self::JobFirst),
            "table" | "table-first" => Ok(Self::TableFirst),
            "fixture" | "fixture-first" => Ok(Self::FixtureFirst),
            _ => Err(crate::Error::field(
                "variants",
                format!("unknown variant {}", s),
            )),
        }
    }
}
