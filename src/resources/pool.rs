use super::fixtures::FixtureId;
use super::fixtures::FixtureLedger;
use super::fixtures::Holder;
use super::molds;
use super::molds::MoldBank;
use super::molds::MoldName;
use crate::JobIdx;
use crate::shop::job::Job;
use crate::shop::job::JobPlan;
use crate::shop::table::TableId;
use serde::Deserialize;
use serde::Serialize;

/// why a placement attempt could not go through. these are recovered
/// locally by the driver and reported on the unscheduled list, never
/// raised as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Reason {
    NoFixture,
    NoMold,
    NoCapacity,
    ClassPairingBlocked,
}

/// the resources one placed job holds: its fixture slot and the
/// concrete mold lines drawn (after any substitution)
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    pub job: JobIdx,
    pub table: TableId,
    pub fixture: Option<FixtureId>,
    pub molds: Vec<(MoldName, u32)>,
}

/// the single owned aggregate of global mutable resource state.
/// the driver clones one snapshot per method/variant run, so
/// explorations never observe each other.
#[derive(Debug, Clone, Default)]
pub struct ResourcePool {
    pub fixtures: FixtureLedger,
    pub molds: MoldBank,
}

impl ResourcePool {
    /// all-or-nothing reservation for one placement: fixture first,
    /// then every mold line; any failure unwinds the whole attempt.
    pub fn reserve(
        &mut self,
        idx: JobIdx,
        job: &Job,
        plan: &JobPlan,
        table: TableId,
    ) -> Result<Reservation, Reason> {
        let holder = Holder { table, job: idx };
        let fixture = match &plan.fixture {
            Some(id) => match self.fixtures.try_reserve(id, job.pattern, holder) {
                true => Some(id.clone()),
                false => return Err(Reason::NoFixture),
            },
            None => None,
        };
        let lines = molds::requirement(plan.depth, job.mold_type, table.color, job.molds);
        match self.molds.reserve(idx, table.color, &lines) {
            Some(taken) => {
                self.fixtures.note_landing(table, fixture.as_ref());
                Ok(Reservation {
                    job: idx,
                    table,
                    fixture,
                    molds: taken,
                })
            }
            None => {
                if let Some(id) = &fixture {
                    self.fixtures.release(id, holder);
                }
                Err(Reason::NoMold)
            }
        }
    }

    /// commitment for an on-table-today job: the molds and fixture are
    /// already on the floor, so the hold always lands. returns the
    /// reservation and whether any account went over capacity.
    pub fn prereserve(
        &mut self,
        idx: JobIdx,
        job: &Job,
        plan: &JobPlan,
        table: TableId,
    ) -> (Reservation, bool) {
        let holder = Holder { table, job: idx };
        let mut over = false;
        let fixture = plan.fixture.as_ref().map(|id| {
            over |= self.fixtures.force_reserve(id, job.pattern, holder);
            id.clone()
        });
        let lines = molds::requirement(plan.depth, job.mold_type, table.color, job.molds);
        over |= self.molds.force_reserve(&lines);
        self.fixtures.note_landing(table, fixture.as_ref());
        (
            Reservation {
                job: idx,
                table,
                fixture,
                molds: lines,
            },
            over,
        )
    }

    /// roll a placement back, e.g. when the simulator could not run
    /// the job after all
    pub fn release(&mut self, r: &Reservation) {
        if let Some(id) = &r.fixture {
            self.fixtures.release(
                id,
                Holder {
                    table: r.table,
                    job: r.job,
                },
            );
        }
        self.molds.release(&r.molds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Arbitrary;
    use crate::shop::calendar::Calendar;
    use crate::shop::color::Color;
    use crate::shop::job::Pattern;
    use crate::shop::table::Side;
    use crate::cycles::CycleTable;
    use chrono::NaiveDate;

    fn fixture_job() -> (Job, JobPlan) {
        let mut job = Job::random();
        job.pattern = Pattern::V;
        job.opening = 0.25;
        job.wire = 2.0;
        job.equivalent = 1.0;
        job.molds = 2;
        job.mold_type = crate::shop::job::MoldType::Standard;
        let plan = JobPlan::derive(
            &job,
            &CycleTable::default(),
            &Calendar::default(),
            NaiveDate::from_ymd_opt(2026, 8, 3).unwrap(),
        )
        .unwrap();
        (job, plan)
    }

    #[test]
    fn fixture_failure_leaves_molds_untouched() {
        let mut pool = ResourcePool::default();
        let (job, plan) = fixture_job();
        let red1 = TableId::new(Color::Red, Side::One);
        let blue1 = TableId::new(Color::Blue, Side::One);
        let green1 = TableId::new(Color::Green, Side::One);
        pool.reserve(0, &job, &plan, red1).unwrap();
        pool.reserve(1, &job, &plan, blue1).unwrap();
        // pattern V capacity 2 is exhausted
        assert!(pool.reserve(2, &job, &plan, green1) == Err(Reason::NoFixture));
        assert!(pool.molds.available(MoldName::Color(Color::Green), Color::Green) == 12);
    }

    #[test]
    fn mold_failure_unwinds_the_fixture() {
        let mut pool = ResourcePool::default();
        let (mut job, plan) = fixture_job();
        job.molds = 20;
        let red1 = TableId::new(Color::Red, Side::One);
        // 12 red + 4 common cannot supply 20 molds
        assert!(pool.reserve(0, &job, &plan, red1) == Err(Reason::NoMold));
        // the fixture slot came back, and no landing was recorded
        let (job2, plan2) = fixture_job();
        let blue1 = TableId::new(Color::Blue, Side::One);
        let green1 = TableId::new(Color::Green, Side::One);
        pool.reserve(1, &job2, &plan2, blue1).unwrap();
        pool.reserve(2, &job2, &plan2, green1).unwrap();
        assert!(
            !pool
                .fixtures
                .same_as_previous_on_table(plan.fixture.as_ref().unwrap(), red1)
        );
    }

    #[test]
    fn release_restores_everything() {
        let mut pool = ResourcePool::default();
        let (job, plan) = fixture_job();
        let red1 = TableId::new(Color::Red, Side::One);
        let r = pool.reserve(0, &job, &plan, red1).unwrap();
        pool.release(&r);
        assert!(pool.molds.available(MoldName::Color(Color::Red), Color::Red) == 12);
        assert!(pool.fixtures.holders(plan.fixture.as_ref().unwrap()) == 0);
    }
}
