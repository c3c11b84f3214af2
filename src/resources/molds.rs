use crate::JobIdx;
use crate::N_CELLS;
use crate::shop::color::Color;
use crate::shop::job::MoldDepth;
use crate::shop::job::MoldType;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::fmt::Formatter;

/// every pool a mold can be drawn from: one per cell color, the
/// common and deep shared pools, and the specialty singletons.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MoldName {
    Color(Color),
    Common,
    Deep,
    Double2cc,
    ThreeInUrethane,
    DeepDouble2cc,
}

impl Display for MoldName {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Self::Color(c) => write!(f, "{}_MOLD", c),
            Self::Common => write!(f, "COMMON_MOLD"),
            Self::Deep => write!(f, "DEEP_MOLD"),
            Self::Double2cc => write!(f, "DOUBLE2CC"),
            Self::ThreeInUrethane => write!(f, "3INURETHANE"),
            Self::DeepDouble2cc => write!(f, "DEEP_DOUBLE2CC"),
        }
    }
}

impl From<MoldName> for String {
    fn from(name: MoldName) -> Self {
        name.to_string()
    }
}

impl TryFrom<String> for MoldName {
    type Error = crate::Error;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_str() {
            "COMMON_MOLD" => Ok(Self::Common),
            "DEEP_MOLD" => Ok(Self::Deep),
            "DOUBLE2CC" => Ok(Self::Double2cc),
            "3INURETHANE" => Ok(Self::ThreeInUrethane),
            "DEEP_DOUBLE2CC" => Ok(Self::DeepDouble2cc),
            other => match other.strip_suffix("_MOLD") {
                Some(color) => Ok(Self::Color(Color::try_from(color)?)),
                None => Err(crate::Error::field(
                    "mold",
                    format!("unknown mold name {}", other),
                )),
            },
        }
    }
}

/// the mold decomposition for one job: which pools supply its N molds.
pub fn requirement(
    depth: MoldDepth,
    mold_type: MoldType,
    target: Color,
    n: u32,
) -> Vec<(MoldName, u32)> {
    let lines = match (depth, mold_type) {
        (MoldDepth::Deep, MoldType::Standard) => vec![(MoldName::Deep, n)],
        (MoldDepth::Deep, _) => vec![(MoldName::Deep, n - 1), (MoldName::DeepDouble2cc, 1)],
        (MoldDepth::Std, MoldType::Standard) => vec![(MoldName::Color(target), n)],
        (MoldDepth::Std, MoldType::ThreeInUrethane) => vec![
            (MoldName::Color(target), n - 1),
            (MoldName::ThreeInUrethane, 1),
        ],
        (MoldDepth::Std, MoldType::Double2cc) => vec![
            (MoldName::Color(target), n.saturating_sub(2)),
            (MoldName::Double2cc, 1),
        ],
    };
    lines.into_iter().filter(|(_, n)| *n > 0).collect()
}

/// one pool: capacity, current reservations, and the compliance row
/// saying which cell colors may draw from it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoldPool {
    pub capacity: usize,
    #[serde(default)]
    pub in_use: usize,
    pub compliance: [bool; N_CELLS],
}

impl MoldPool {
    pub fn new(capacity: usize, compliance: [bool; N_CELLS]) -> Self {
        Self {
            capacity,
            in_use: 0,
            compliance,
        }
    }
    fn available(&self, target: Color) -> u32 {
        if self.compliance[target.index()] {
            self.capacity.saturating_sub(self.in_use) as u32
        } else {
            0
        }
    }
}

/// a supplement drawn from outside the target cell's own pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Borrow {
    pub job: JobIdx,
    pub from: MoldName,
    pub count: u32,
    pub to: Color,
}

/// global mold accounting for one scheduling run. cloning the bank
/// snapshots every pool, which is how variants explore independently.
#[derive(Debug, Clone)]
pub struct MoldBank {
    pools: BTreeMap<MoldName, MoldPool>,
    active: [bool; N_CELLS],
    borrows: Vec<Borrow>,
}

impl Default for MoldBank {
    fn default() -> Self {
        let all = [true; N_CELLS];
        let mut no_orange = all;
        no_orange[Color::Orange.index()] = false;
        let mut pools = BTreeMap::new();
        for color in Color::all() {
            pools.insert(
                MoldName::Color(*color),
                MoldPool::new(crate::COLOR_MOLD_CAP, all),
            );
        }
        pools.insert(MoldName::Common, MoldPool::new(crate::COMMON_MOLD_CAP, all));
        pools.insert(MoldName::Deep, MoldPool::new(crate::DEEP_MOLD_CAP, all));
        pools.insert(MoldName::Double2cc, MoldPool::new(1, no_orange));
        pools.insert(MoldName::ThreeInUrethane, MoldPool::new(1, no_orange));
        pools.insert(MoldName::DeepDouble2cc, MoldPool::new(1, no_orange));
        Self {
            pools,
            active: [true; N_CELLS],
            borrows: vec![],
        }
    }
}

impl MoldBank {
    pub fn new(pools: BTreeMap<MoldName, MoldPool>) -> Self {
        Self {
            pools,
            active: [true; N_CELLS],
            borrows: vec![],
        }
    }

    pub fn with_active(mut self, active: [bool; N_CELLS]) -> Self {
        self.active = active;
        self
    }

    pub fn set_active(&mut self, active: [bool; N_CELLS]) {
        self.active = active;
    }

    /// re-admit orange to a specialty singleton pool
    pub fn admit_orange(&mut self, name: MoldName) {
        if let Some(pool) = self.pools.get_mut(&name) {
            pool.compliance[Color::Orange.index()] = true;
        }
    }

    pub fn available(&self, name: MoldName, target: Color) -> u32 {
        self.pools.get(&name).map(|p| p.available(target)).unwrap_or(0)
    }

    /// the most molds a requirement line could ever draw for a target
    /// color: the primary pool at full capacity plus, for color lines,
    /// every substitution source at full capacity. ignores current
    /// reservations, so a zero here is terminal.
    pub fn reachable(&self, name: MoldName, target: Color) -> u32 {
        let cap = |n: MoldName| {
            self.pools
                .get(&n)
                .map(|p| match p.compliance[target.index()] {
                    true => p.capacity as u32,
                    false => 0,
                })
                .unwrap_or(0)
        };
        let mut total = cap(name);
        if let MoldName::Color(_) = name {
            total += self
                .substitutes(name, target)
                .iter()
                .map(|s| cap(*s))
                .sum::<u32>();
        }
        total
    }

    pub fn borrows(&self) -> &[Borrow] {
        &self.borrows
    }

    fn bump(&mut self, name: MoldName, count: u32) {
        if let Some(pool) = self.pools.get_mut(&name) {
            pool.in_use += count as usize;
        }
    }

    fn unwind(&mut self, taken: &[(MoldName, u32)]) {
        for (name, count) in taken {
            if let Some(pool) = self.pools.get_mut(name) {
                pool.in_use = pool.in_use.saturating_sub(*count as usize);
            }
        }
    }

    /// all-or-nothing reservation of a decomposed requirement.
    ///
    /// color shortfalls substitute in priority order: the common pool
    /// first, then color pools of inactive cells whose compliance row
    /// admits the target. specialty and deep lines never substitute.
    /// returns the concrete lines taken, for release later.
    pub fn reserve(
        &mut self,
        job: JobIdx,
        target: Color,
        lines: &[(MoldName, u32)],
    ) -> Option<Vec<(MoldName, u32)>> {
        let mut taken: Vec<(MoldName, u32)> = vec![];
        let mut borrows: Vec<Borrow> = vec![];
        for (name, want) in lines {
            let mut need = *want;
            let head = need.min(self.available(*name, target));
            if head > 0 {
                self.bump(*name, head);
                taken.push((*name, head));
                need -= head;
            }
            if let MoldName::Color(_) = name {
                for source in self.substitutes(*name, target) {
                    if need == 0 {
                        break;
                    }
                    let take = need.min(self.available(source, target));
                    if take > 0 {
                        self.bump(source, take);
                        taken.push((source, take));
                        borrows.push(Borrow {
                            job,
                            from: source,
                            count: take,
                            to: target,
                        });
                        need -= take;
                    }
                }
            }
            if need > 0 {
                self.unwind(&taken);
                return None;
            }
        }
        self.borrows.append(&mut borrows);
        Some(taken)
    }

    /// substitution sources for a short color pool, best first
    fn substitutes(&self, primary: MoldName, _target: Color) -> Vec<MoldName> {
        let mut sources = vec![MoldName::Common];
        for color in Color::all() {
            let name = MoldName::Color(*color);
            if name != primary && !self.active[color.index()] {
                sources.push(name);
            }
        }
        sources
    }

    /// pre-reservation for an on-table-today job. the molds are
    /// already physically committed, so the literal decomposition is
    /// taken with no substitution; returns true when any pool went
    /// over capacity and now carries a deficit.
    pub fn force_reserve(&mut self, lines: &[(MoldName, u32)]) -> bool {
        let mut over = false;
        for (name, count) in lines {
            if let Some(pool) = self.pools.get_mut(name) {
                pool.in_use += *count as usize;
                over |= pool.in_use > pool.capacity;
            }
        }
        over
    }

    pub fn release(&mut self, lines: &[(MoldName, u32)]) {
        self.unwind(lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decomposition_table() {
        let red = Color::Red;
        assert!(
            requirement(MoldDepth::Deep, MoldType::Standard, red, 3)
                == vec![(MoldName::Deep, 3)]
        );
        assert!(
            requirement(MoldDepth::Deep, MoldType::Double2cc, red, 3)
                == vec![(MoldName::Deep, 2), (MoldName::DeepDouble2cc, 1)]
        );
        assert!(
            requirement(MoldDepth::Std, MoldType::Standard, red, 3)
                == vec![(MoldName::Color(red), 3)]
        );
        assert!(
            requirement(MoldDepth::Std, MoldType::ThreeInUrethane, red, 3)
                == vec![(MoldName::Color(red), 2), (MoldName::ThreeInUrethane, 1)]
        );
        assert!(
            requirement(MoldDepth::Std, MoldType::Double2cc, red, 3)
                == vec![(MoldName::Color(red), 1), (MoldName::Double2cc, 1)]
        );
        // a two-mold double2cc job needs no color molds at all
        assert!(
            requirement(MoldDepth::Std, MoldType::Double2cc, red, 2)
                == vec![(MoldName::Double2cc, 1)]
        );
    }

    #[test]
    fn common_supplements_short_color_pool() {
        let mut bank = MoldBank::default();
        let red = MoldName::Color(Color::Red);
        let taken = bank.reserve(0, Color::Red, &[(red, 14)]).unwrap();
        assert!(taken == vec![(red, 12), (MoldName::Common, 2)]);
        assert!(bank.borrows().len() == 1);
        assert!(bank.borrows()[0].count == 2);
    }

    #[test]
    fn no_inactive_borrowing_when_all_active() {
        let mut bank = MoldBank::default();
        let red = MoldName::Color(Color::Red);
        // 12 red + 4 common = 16 is the ceiling with every cell active
        assert!(bank.reserve(0, Color::Red, &[(red, 17)]).is_none());
        // the failed attempt left nothing reserved
        assert!(bank.available(red, Color::Red) == 12);
        assert!(bank.available(MoldName::Common, Color::Red) == 4);
    }

    #[test]
    fn inactive_cell_lends_compliant_molds() {
        let mut active = [true; N_CELLS];
        active[Color::Purple.index()] = false;
        let mut bank = MoldBank::default().with_active(active);
        let red = MoldName::Color(Color::Red);
        let taken = bank.reserve(0, Color::Red, &[(red, 18)]).unwrap();
        assert!(taken.contains(&(MoldName::Color(Color::Purple), 2)));
    }

    #[test]
    fn reservation_is_all_or_nothing() {
        let mut bank = MoldBank::default();
        let red = MoldName::Color(Color::Red);
        // the color line would fit, the singleton line cannot
        bank.reserve(0, Color::Blue, &[(MoldName::Double2cc, 1)])
            .unwrap();
        assert!(
            bank.reserve(1, Color::Red, &[(red, 2), (MoldName::Double2cc, 1)])
                .is_none()
        );
        assert!(bank.available(red, Color::Red) == 12);
    }

    #[test]
    fn orange_excluded_from_specialty_singletons() {
        let mut bank = MoldBank::default();
        assert!(bank.available(MoldName::Double2cc, Color::Orange) == 0);
        bank.admit_orange(MoldName::Double2cc);
        assert!(bank.available(MoldName::Double2cc, Color::Orange) == 1);
    }

    #[test]
    fn reachable_counts_capacity_not_reservations() {
        let mut bank = MoldBank::default();
        let red = MoldName::Color(Color::Red);
        // every cell active: own pool plus common is the ceiling
        assert!(bank.reachable(red, Color::Red) == 16);
        bank.reserve(0, Color::Red, &[(red, 12)]).unwrap();
        assert!(bank.reachable(red, Color::Red) == 16);
        // an idle purple cell raises the ceiling by its pool
        let mut active = [true; N_CELLS];
        active[Color::Purple.index()] = false;
        bank.set_active(active);
        assert!(bank.reachable(red, Color::Red) == 28);
        // orange can never reach the specialty singletons by default
        assert!(bank.reachable(MoldName::Double2cc, Color::Orange) == 0);
        assert!(bank.reachable(MoldName::Double2cc, Color::Red) == 1);
    }

    #[test]
    fn deficit_blocks_until_release() {
        let mut bank = MoldBank::default();
        let red = MoldName::Color(Color::Red);
        bank.reserve(0, Color::Red, &[(red, 12)]).unwrap();
        assert!(bank.force_reserve(&[(red, 2)]));
        bank.release(&[(red, 3)]);
        // 11 of 12 in use: exactly one mold free again
        assert!(bank.available(red, Color::Red) == 1);
    }
}
