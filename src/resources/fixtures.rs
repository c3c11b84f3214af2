use crate::JobIdx;
use crate::shop::job::Job;
use crate::shop::job::Pattern;
use crate::shop::table::TableId;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::fmt::Formatter;

/// tooling set identity: pattern, opening size, wire diameter.
/// two jobs with the same fixture id can share the physical fixture
/// when they run back to back on one table.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FixtureId(String);

impl FixtureId {
    /// fixtures exist only for fine wire
    pub fn of(job: &Job) -> Option<Self> {
        (job.wire <= 4.0).then(|| Self(format!("{}-{}-{}", job.pattern, job.opening, job.wire)))
    }
}

impl Display for FixtureId {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// who holds a fixture: a job sitting on a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holder {
    pub table: TableId,
    pub job: JobIdx,
}

/// global fixture accounting for one scheduling run.
///
/// concurrency is counted in tables, not jobs: consecutive jobs on
/// one table with the same fixture id keep the fixture where it sits,
/// so they occupy a single slot of the pattern capacity.
#[derive(Debug, Clone)]
pub struct FixtureLedger {
    caps: BTreeMap<Pattern, usize>,
    held: BTreeMap<FixtureId, Vec<Holder>>,
    last: BTreeMap<TableId, FixtureId>,
}

impl Default for FixtureLedger {
    fn default() -> Self {
        Self::new(
            Pattern::all()
                .iter()
                .map(|p| (*p, p.capacity()))
                .collect::<BTreeMap<_, _>>(),
        )
    }
}

impl FixtureLedger {
    pub fn new(caps: BTreeMap<Pattern, usize>) -> Self {
        Self {
            caps,
            held: BTreeMap::new(),
            last: BTreeMap::new(),
        }
    }

    pub fn capacity(&self, pattern: Pattern) -> usize {
        self.caps.get(&pattern).copied().unwrap_or(pattern.capacity())
    }

    /// number of tables currently holding this fixture id
    pub fn holders(&self, id: &FixtureId) -> usize {
        self.held
            .get(id)
            .map(|hs| {
                let mut tables = hs.iter().map(|h| h.table).collect::<Vec<_>>();
                tables.sort();
                tables.dedup();
                tables.len()
            })
            .unwrap_or(0)
    }

    /// reserve under the pattern capacity. succeeds without consuming
    /// a new slot when the fixture already sits on the holder's table.
    pub fn try_reserve(&mut self, id: &FixtureId, pattern: Pattern, holder: Holder) -> bool {
        let sharing = self
            .held
            .get(id)
            .is_some_and(|hs| hs.iter().any(|h| h.table == holder.table));
        if !sharing && self.holders(id) >= self.capacity(pattern) {
            return false;
        }
        self.held.entry(id.clone()).or_default().push(holder);
        true
    }

    /// record which fixture (if any) a successfully placed job left on
    /// the table. called once the whole placement has committed, so a
    /// rolled-back attempt never poisons the zero-setup test.
    pub fn note_landing(&mut self, table: TableId, id: Option<&FixtureId>) {
        match id {
            Some(id) => self.last.insert(table, id.clone()),
            None => self.last.remove(&table),
        };
    }

    /// pre-reservation for an on-table-today job. the operator has
    /// already committed physically, so the hold always lands; returns
    /// true when the pattern capacity was exceeded and a deficit is
    /// now carried.
    pub fn force_reserve(&mut self, id: &FixtureId, pattern: Pattern, holder: Holder) -> bool {
        let sharing = self
            .held
            .get(id)
            .is_some_and(|hs| hs.iter().any(|h| h.table == holder.table));
        let over = !sharing && self.holders(id) >= self.capacity(pattern);
        self.held.entry(id.clone()).or_default().push(holder);
        over
    }

    pub fn release(&mut self, id: &FixtureId, holder: Holder) {
        if let Some(hs) = self.held.get_mut(id) {
            if let Some(i) = hs.iter().position(|h| *h == holder) {
                hs.remove(i);
            }
            if hs.is_empty() {
                self.held.remove(id);
            }
        }
    }

    /// zero-setup test: is this the fixture most recently placed on
    /// the table?
    pub fn same_as_previous_on_table(&self, id: &FixtureId, table: TableId) -> bool {
        self.last.get(&table) == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shop::color::Color;
    use crate::shop::table::Side;

    fn fid(s: &str) -> FixtureId {
        FixtureId(s.to_string())
    }

    fn table(color: Color, side: Side) -> TableId {
        TableId::new(color, side)
    }

    #[test]
    fn fixture_id_formats_pattern_opening_wire() {
        use crate::Arbitrary;
        let mut job = Job::random();
        job.pattern = Pattern::D;
        job.opening = 0.25;
        job.wire = 2.0;
        assert!(FixtureId::of(&job).unwrap().to_string() == "D-0.25-2");
        job.wire = 5.0;
        assert!(FixtureId::of(&job).is_none());
    }

    #[test]
    fn v_pattern_capacity_is_two_tables() {
        let mut ledger = FixtureLedger::default();
        let id = fid("V-0.25-2");
        let t1 = table(Color::Red, Side::One);
        let t2 = table(Color::Blue, Side::One);
        let t3 = table(Color::Green, Side::One);
        assert!(ledger.try_reserve(&id, Pattern::V, Holder { table: t1, job: 0 }));
        assert!(ledger.try_reserve(&id, Pattern::V, Holder { table: t2, job: 1 }));
        assert!(!ledger.try_reserve(&id, Pattern::V, Holder { table: t3, job: 2 }));
    }

    #[test]
    fn same_table_shares_a_slot() {
        let mut ledger = FixtureLedger::default();
        let id = fid("V-0.25-2");
        let t1 = table(Color::Red, Side::One);
        let t2 = table(Color::Blue, Side::Two);
        assert!(ledger.try_reserve(&id, Pattern::V, Holder { table: t1, job: 0 }));
        assert!(ledger.try_reserve(&id, Pattern::V, Holder { table: t1, job: 1 }));
        assert!(ledger.try_reserve(&id, Pattern::V, Holder { table: t2, job: 2 }));
        assert!(ledger.holders(&id) == 2);
    }

    #[test]
    fn release_frees_the_slot() {
        let mut ledger = FixtureLedger::default();
        let id = fid("V-1-2");
        let t1 = table(Color::Red, Side::One);
        let t2 = table(Color::Blue, Side::One);
        let t3 = table(Color::Green, Side::One);
        ledger.try_reserve(&id, Pattern::V, Holder { table: t1, job: 0 });
        ledger.try_reserve(&id, Pattern::V, Holder { table: t2, job: 1 });
        assert!(!ledger.try_reserve(&id, Pattern::V, Holder { table: t3, job: 2 }));
        ledger.release(&id, Holder { table: t1, job: 0 });
        assert!(ledger.try_reserve(&id, Pattern::V, Holder { table: t3, job: 2 }));
    }

    #[test]
    fn force_reserve_reports_overcommit() {
        let mut ledger = FixtureLedger::default();
        let id = fid("V-1-2");
        let t1 = table(Color::Red, Side::One);
        let t2 = table(Color::Blue, Side::One);
        let t3 = table(Color::Green, Side::One);
        assert!(!ledger.force_reserve(&id, Pattern::V, Holder { table: t1, job: 0 }));
        assert!(!ledger.force_reserve(&id, Pattern::V, Holder { table: t2, job: 1 }));
        assert!(ledger.force_reserve(&id, Pattern::V, Holder { table: t3, job: 2 }));
        // the carried deficit blocks the next reservation until a release
        let t4 = table(Color::Black, Side::One);
        assert!(!ledger.try_reserve(&id, Pattern::V, Holder { table: t4, job: 3 }));
    }

    #[test]
    fn tracks_last_fixture_per_table() {
        let mut ledger = FixtureLedger::default();
        let t1 = table(Color::Red, Side::One);
        ledger.note_landing(t1, Some(&fid("D-1-2")));
        assert!(ledger.same_as_previous_on_table(&fid("D-1-2"), t1));
        assert!(!ledger.same_as_previous_on_table(&fid("D-1-4"), t1));
        ledger.note_landing(t1, Some(&fid("D-1-4")));
        assert!(ledger.same_as_previous_on_table(&fid("D-1-4"), t1));
        // a fixtureless job takes the table over and clears the record
        ledger.note_landing(t1, None);
        assert!(!ledger.same_as_previous_on_table(&fid("D-1-4"), t1));
    }
}
