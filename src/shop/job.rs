use super::calendar::Calendar;
use super::table::TableId;
use crate::Arbitrary;
use crate::Error;
use crate::Load;
use crate::Qty;
use crate::cycles::Class;
use crate::cycles::CycleTable;
use crate::resources::FixtureId;
use chrono::NaiveDate;
use serde::Deserialize;
use serde::Serialize;
use std::fmt::Display;
use std::fmt::Formatter;

/// tooling pattern letter. fixtures of one pattern share a
/// shop-wide concurrency capacity.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Pattern {
    D,
    V,
    S,
}

impl Pattern {
    pub const fn all() -> &'static [Self] {
        &[Self::D, Self::V, Self::S]
    }
    pub const fn capacity(&self) -> usize {
        match self {
            Self::D => crate::FIXTURE_CAP_D,
            Self::V => crate::FIXTURE_CAP_V,
            Self::S => crate::FIXTURE_CAP_S,
        }
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::D => "D",
                Self::V => "V",
                Self::S => "S",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoldType {
    #[serde(rename = "STANDARD")]
    Standard,
    #[serde(rename = "DOUBLE2CC")]
    Double2cc,
    #[serde(rename = "3INURETHANE")]
    ThreeInUrethane,
}

/// deep molds come out of their own shared pool regardless of color
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoldDepth {
    Std,
    Deep,
}

impl MoldDepth {
    pub fn of(wire: f32) -> Self {
        if wire >= 8.0 { Self::Deep } else { Self::Std }
    }
}

/// urgency tier. lower is more urgent.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Overdue = 0,
    DueToday = 1,
    Expedited = 2,
    Routine = 3,
}

impl Priority {
    pub const fn all() -> &'static [Self] {
        &[Self::Overdue, Self::DueToday, Self::Expedited, Self::Routine]
    }
    pub fn of(build_date: NaiveDate, today: NaiveDate, expedite: bool) -> Self {
        if build_date < today || (build_date == today && expedite) {
            Self::Overdue
        } else if build_date == today {
            Self::DueToday
        } else if expedite {
            Self::Expedited
        } else {
            Self::Routine
        }
    }
    pub const fn index(&self) -> usize {
        *self as usize
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", *self as isize)
    }
}

/// a validated work order. identifiers keep their text form; the
/// NNNNNN-NN-N shape is checked at the boundary and treated as opaque
/// from here on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub required_by: NaiveDate,
    pub quantity: Qty,
    pub pattern: Pattern,
    pub opening: f32,
    pub wire: f32,
    pub molds: u32,
    pub mold_type: MoldType,
    pub equivalent: f32,
    pub orange_ok: bool,
    pub on_table: Option<TableId>,
    pub remaining: Option<Qty>,
    pub expedite: bool,
}

impl Job {
    /// NNNNNN-NN-N
    pub fn valid_id(id: &str) -> bool {
        let mut parts = id.split('-');
        let shape = [6usize, 2, 1];
        let ok = shape.into_iter().all(|n| {
            parts
                .next()
                .is_some_and(|p| p.len() == n && p.bytes().all(|b| b.is_ascii_digit()))
        });
        ok && parts.next().is_none()
    }
}

/// per-run derived attributes, computed once before the method search.
/// deriving is pure and idempotent: same job, same constants, same
/// date, same plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPlan {
    /// scheduling quantity: remaining if the job is already on a
    /// table today, else the full production quantity
    pub qty: Qty,
    /// required only for fine wire
    pub fixture: Option<FixtureId>,
    pub depth: MoldDepth,
    pub class: Class,
    /// quantity x equivalent / scheduling-constant, two places
    pub load: Load,
    pub build_date: NaiveDate,
    pub priority: Priority,
}

impl JobPlan {
    pub fn derive(
        job: &Job,
        cycles: &CycleTable,
        calendar: &Calendar,
        today: NaiveDate,
    ) -> Result<Self, Error> {
        let row = cycles.lookup(job.wire, job.equivalent)?;
        let qty = match job.on_table {
            Some(_) => job.remaining.unwrap_or(job.quantity),
            None => job.quantity,
        };
        let load = ((qty as f32 * job.equivalent / row.constant) * 100.0).round() / 100.0;
        let lead = (load + row.pull_ahead).ceil() as u32;
        let build_date = calendar.back(job.required_by, lead);
        Ok(Self {
            qty,
            fixture: FixtureId::of(job),
            depth: MoldDepth::of(job.wire),
            class: row.class,
            load,
            build_date,
            priority: Priority::of(build_date, today, job.expedite),
        })
    }
}

impl Arbitrary for Job {
    fn random() -> Self {
        use rand::Rng;
        let mut rng = rand::rng();
        let wire = [2.0f32, 4.0, 5.0, 6.0, 8.0, 10.0][rng.random_range(0..6)];
        let equivalent = [0.5f32, 1.0, 1.5, 2.0, 3.0][rng.random_range(0..5)];
        let pattern = Pattern::all()[rng.random_range(0..3)];
        Self {
            id: format!(
                "{:06}-{:02}-{}",
                rng.random_range(0..1_000_000),
                rng.random_range(0..100),
                rng.random_range(0..10)
            ),
            required_by: NaiveDate::from_ymd_opt(2026, 8, rng.random_range(3..29)).unwrap(),
            quantity: rng.random_range(1..6),
            pattern,
            opening: [0.25f32, 0.5, 1.0][rng.random_range(0..3)],
            wire,
            molds: rng.random_range(1..4),
            mold_type: MoldType::Standard,
            equivalent,
            orange_ok: rng.random_range(0..2) == 0,
            on_table: None,
            remaining: None,
            expedite: rng.random_range(0..4) == 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shop::color::Color;
    use crate::shop::table::Side;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, d).unwrap()
    }

    fn job() -> Job {
        Job {
            id: "123456-01-1".into(),
            required_by: day(14),
            quantity: 4,
            pattern: Pattern::D,
            opening: 0.25,
            wire: 6.0,
            molds: 3,
            mold_type: MoldType::Standard,
            equivalent: 1.0,
            orange_ok: true,
            on_table: None,
            remaining: None,
            expedite: false,
        }
    }

    #[test]
    fn id_shape() {
        assert!(Job::valid_id("123456-01-1"));
        assert!(!Job::valid_id("12345-01-1"));
        assert!(!Job::valid_id("123456-1-1"));
        assert!(!Job::valid_id("123456-01-12"));
        assert!(!Job::valid_id("123456-01"));
        assert!(!Job::valid_id("123456-0a-1"));
    }

    #[test]
    fn derives_load_and_build_date() {
        let plan = JobPlan::derive(&job(), &CycleTable::default(), &Calendar::default(), day(3));
        let plan = plan.unwrap();
        // 4 x 1.0 / 2.4 = 1.67, plus pull-ahead 0.5, ceil -> 3 days
        assert!(plan.load == 1.67);
        // friday aug 14 back 3 business days is tuesday aug 11
        assert!(plan.build_date == day(11));
        assert!(plan.priority == Priority::Routine);
    }

    #[test]
    fn scheduling_quantity_prefers_remaining_on_table() {
        let mut j = job();
        j.on_table = Some(TableId::new(Color::Red, Side::One));
        j.remaining = Some(2);
        let plan =
            JobPlan::derive(&j, &CycleTable::default(), &Calendar::default(), day(3)).unwrap();
        assert!(plan.qty == 2);
        let j = job();
        let plan =
            JobPlan::derive(&j, &CycleTable::default(), &Calendar::default(), day(3)).unwrap();
        assert!(plan.qty == 4);
    }

    #[test]
    fn fixture_only_for_fine_wire() {
        let mut j = job();
        j.wire = 4.0;
        let plan =
            JobPlan::derive(&j, &CycleTable::default(), &Calendar::default(), day(3)).unwrap();
        assert!(plan.fixture.is_some());
        j.wire = 5.0;
        let plan =
            JobPlan::derive(&j, &CycleTable::default(), &Calendar::default(), day(3)).unwrap();
        assert!(plan.fixture.is_none());
    }

    #[test]
    fn deep_at_exactly_eight() {
        let mut j = job();
        j.wire = 8.0;
        let plan =
            JobPlan::derive(&j, &CycleTable::default(), &Calendar::default(), day(3)).unwrap();
        assert!(plan.depth == MoldDepth::Deep);
        j.wire = 7.9;
        let plan =
            JobPlan::derive(&j, &CycleTable::default(), &Calendar::default(), day(3)).unwrap();
        assert!(plan.depth == MoldDepth::Std);
    }

    #[test]
    fn priority_tiers() {
        assert!(Priority::of(day(2), day(3), false) == Priority::Overdue);
        assert!(Priority::of(day(3), day(3), true) == Priority::Overdue);
        assert!(Priority::of(day(3), day(3), false) == Priority::DueToday);
        assert!(Priority::of(day(4), day(3), true) == Priority::Expedited);
        assert!(Priority::of(day(4), day(3), false) == Priority::Routine);
    }

    #[test]
    fn derivation_is_idempotent() {
        for _ in 0..32 {
            let j = Job::random();
            let cycles = CycleTable::default();
            let cal = Calendar::default();
            let a = JobPlan::derive(&j, &cycles, &cal, day(3)).unwrap();
            let b = JobPlan::derive(&j, &cycles, &cal, day(3)).unwrap();
            assert!(a == b);
        }
    }
}
