use crate::JobIdx;
use crate::Minutes;
use crate::Qty;
use crate::cycles::CycleRow;
use crate::shop::job::Job;
use serde::Deserialize;
use serde::Serialize;

/// one task interval, minutes from shift start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: Minutes,
    pub end: Minutes,
}

impl Span {
    pub const fn new(start: Minutes, end: Minutes) -> Self {
        Self { start, end }
    }
    pub const fn len(&self) -> Minutes {
        self.end - self.start
    }
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// the five task intervals of a realised panel, in pipeline order
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Tasks {
    pub setup: Span,
    pub layout: Span,
    pub pour: Span,
    pub cure: Span,
    pub unload: Span,
}

impl Tasks {
    /// task starts must ascend through the pipeline
    pub fn ordered(&self) -> bool {
        self.setup.start <= self.layout.start
            && self.layout.start <= self.pour.start
            && self.pour.start <= self.cure.start
            && self.cure.start <= self.unload.start
    }
}

/// a final-plan panel: committed production on a table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Panel {
    pub job: JobIdx,
    /// position within the job's run, 1-based
    pub ordinal: u32,
    pub tasks: Tasks,
}

/// an end-of-day partial panel: setup and layout done today, pour
/// tomorrow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepPanel {
    pub job: JobIdx,
    pub ordinal: u32,
    pub setup: Span,
    pub layout: Span,
}

/// per-task durations for a panel that has not been placed yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Durations {
    pub setup: Minutes,
    pub layout: Minutes,
    pub pour: Minutes,
    pub cure: Minutes,
    pub unload: Minutes,
}

impl Durations {
    /// the operator-bearing front of the cycle
    pub const fn op_work(&self) -> Minutes {
        self.setup + self.layout + self.pour
    }
    pub const fn total(&self) -> Minutes {
        self.op_work() + self.cure + self.unload
    }
}

/// a rough-plan panel: a queue position with naive durations, not yet
/// interleaved against the counterpart table
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RoughPanel {
    pub job: JobIdx,
    pub ordinal: u32,
    pub dur: Durations,
}

impl RoughPanel {
    /// expand a job into its run of rough panels. setup is charged on
    /// the first panel only (and not even there when the fixture is
    /// already sitting on the table); consecutive panels of one job
    /// never pay setup.
    pub fn expand(
        idx: JobIdx,
        job: &Job,
        qty: Qty,
        row: &CycleRow,
        summer: bool,
        fixture_in_place: bool,
    ) -> Vec<Self> {
        let cure = match summer {
            true => (row.cure_base as f32 * crate::SUMMER_CURE_FACTOR).round() as Minutes,
            false => row.cure_base,
        };
        (1..=qty)
            .map(|ordinal| Self {
                job: idx,
                ordinal,
                dur: Durations {
                    setup: match ordinal {
                        1 if !fixture_in_place => row.setup,
                        _ => 0,
                    },
                    layout: row.layout,
                    pour: row.pour_per_mold * job.molds as Minutes,
                    cure,
                    unload: row.unload,
                },
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Arbitrary;
    use crate::cycles::CycleTable;

    #[test]
    fn setup_charged_on_first_panel_only() {
        let mut job = Job::random();
        job.wire = 6.0;
        job.equivalent = 1.0;
        job.molds = 3;
        let table = CycleTable::default();
        let row = table.lookup(job.wire, job.equivalent).unwrap();
        let run = RoughPanel::expand(0, &job, 3, row, false, false);
        assert!(run[0].dur.setup == 10);
        assert!(run[1].dur.setup == 0);
        assert!(run[2].dur.setup == 0);
        assert!(run.iter().all(|p| p.dur.pour == 6));
    }

    #[test]
    fn fixture_in_place_zeroes_first_setup() {
        let mut job = Job::random();
        job.wire = 2.0;
        job.equivalent = 1.0;
        let table = CycleTable::default();
        let row = table.lookup(job.wire, job.equivalent).unwrap();
        let run = RoughPanel::expand(0, &job, 2, row, false, true);
        assert!(run[0].dur.setup == 0);
    }

    #[test]
    fn summer_scales_cure_by_exactly_three_halves() {
        let mut job = Job::random();
        job.wire = 6.0;
        job.equivalent = 1.0;
        let table = CycleTable::default();
        let row = table.lookup(job.wire, job.equivalent).unwrap();
        let cool = RoughPanel::expand(0, &job, 1, row, false, false);
        let warm = RoughPanel::expand(0, &job, 1, row, true, false);
        assert!(warm[0].dur.cure * 2 == cool[0].dur.cure * 3);
        assert!(warm[0].dur.setup == cool[0].dur.setup);
        assert!(warm[0].dur.unload == cool[0].dur.unload);
    }
}
