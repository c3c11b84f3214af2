use crate::cycles::Class;
use serde::Deserialize;
use serde::Serialize;
use std::fmt::Display;
use std::fmt::Formatter;

/// the four job-selection strategies the search explores. each one
/// reads the same job list and produces its own allocation; the
/// comparator picks the winner afterwards.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Method {
    /// burn down the priority tiers strictly in order
    PriorityFirst,
    /// keep the operator busy: heavy pairing prohibitions go hard
    MinimumForcedIdle,
    /// dedicate one or two cells to class A and let them sprint
    MaximumOutput,
    /// place the restricted classes first, each opposite a light one
    MostRestrictedMix,
}

impl Method {
    pub const fn all() -> &'static [Self] {
        &[
            Self::PriorityFirst,
            Self::MinimumForcedIdle,
            Self::MaximumOutput,
            Self::MostRestrictedMix,
        ]
    }

    /// whether the two pairing prohibitions are rejections rather
    /// than preferences
    pub const fn hard_pairing(&self) -> bool {
        matches!(self, Self::MinimumForcedIdle)
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::PriorityFirst => "priority-first",
                Self::MinimumForcedIdle => "minimum-forced-idle",
                Self::MaximumOutput => "maximum-output",
                Self::MostRestrictedMix => "most-restricted-mix",
            }
        )
    }
}

/// the two pairing prohibitions: no C opposite C, and no D/E
/// opposite D/E. one operator cannot feed two attention-heavy tables.
pub fn clash(class: Class, counterpart: &[Class]) -> bool {
    match class {
        Class::C => counterpart.contains(&Class::C),
        c if c.is_heavy() => counterpart.iter().any(|c| c.is_heavy()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn c_clashes_with_c_only() {
        assert!(clash(Class::C, &[Class::C]));
        assert!(!clash(Class::C, &[Class::A, Class::B, Class::D, Class::E]));
    }

    #[test]
    fn heavies_clash_with_each_other() {
        assert!(clash(Class::D, &[Class::E]));
        assert!(clash(Class::E, &[Class::D]));
        assert!(clash(Class::D, &[Class::D]));
        assert!(!clash(Class::D, &[Class::A, Class::B, Class::C]));
    }

    #[test]
    fn light_classes_never_clash() {
        for counterpart in Class::all() {
            assert!(!clash(Class::A, &[*counterpart]));
            assert!(!clash(Class::B, &[*counterpart]));
        }
    }
}
