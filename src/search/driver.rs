use super::method::Method;
use super::method::clash;
use super::variant::Variant;
use crate::Error;
use crate::JobIdx;
use crate::Minutes;
use crate::N_CELLS;
use crate::OVERTIME_SHIFT;
use crate::STANDARD_SHIFT;
use crate::cycles::Class;
use crate::cycles::CycleRow;
use crate::cycles::CycleTable;
use crate::resources::FixtureId;
use crate::resources::MoldName;
use crate::resources::Reason;
use crate::resources::molds::requirement;
use crate::resources::Reservation;
use crate::resources::ResourcePool;
use crate::shop::Calendar;
use crate::shop::color::Color;
use crate::shop::job::Job;
use crate::shop::job::JobPlan;
use crate::shop::table::Side;
use crate::shop::table::TableId;
use crate::simulate::CellMachine;
use crate::simulate::CellOutcome;
use crate::simulate::CellPlan;
use crate::simulate::Preload;
use crate::simulate::RoughPanel;
use crate::simulate::Unscheduled;
use chrono::Datelike;
use chrono::NaiveDate;
use chrono::Weekday;
use rayon::iter::IntoParallelRefIterator;
use rayon::iter::ParallelIterator;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::fmt::Formatter;

/// what the operator keys in before a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunInputs {
    pub date: NaiveDate,
    pub active: [bool; N_CELLS],
    #[serde(default)]
    pub overtime: bool,
    #[serde(default)]
    pub summer: bool,
    /// re-admit orange to the specialty singleton pools
    #[serde(default)]
    pub orange_double2cc: bool,
    #[serde(default)]
    pub orange_3inurethane: bool,
    #[serde(default)]
    pub orange_deep_double2cc: bool,
    #[serde(default = "all_variants")]
    pub variants: Vec<Variant>,
}

fn all_variants() -> Vec<Variant> {
    Variant::all().to_vec()
}

impl RunInputs {
    pub fn horizon(&self) -> Minutes {
        match self.overtime {
            true => OVERTIME_SHIFT,
            false => STANDARD_SHIFT,
        }
    }
}

/// non-fatal conditions the operator sees next to the summary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum Warning {
    /// on-table-today on an orange table, orange-eligible false
    OrangeIneligible { job: String },
    /// on-table-today on an inactive cell; the job must re-home
    Rehomed { job: String, from: TableId },
    /// pre-reservation pushed a resource account past capacity
    Overcommitted { job: String },
    /// remaining quantity is more than one table can pour in a day
    ExceedsOneDay { job: String },
}

impl Display for Warning {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Self::OrangeIneligible { job } => {
                write!(f, "job {} sits on an orange table but is not orange-eligible", job)
            }
            Self::Rehomed { job, from } => {
                write!(f, "job {} is on inactive table {} and will re-home", job, from)
            }
            Self::Overcommitted { job } => {
                write!(f, "pre-reserving job {} over-committed a resource", job)
            }
            Self::ExceedsOneDay { job } => {
                write!(f, "job {} cannot finish its remaining quantity in one shift", job)
            }
        }
    }
}

/// one explored allocation: a method/variant pair, its simulated
/// cells, and everything it could not place
#[derive(Debug, Clone)]
pub struct Trial {
    pub method: Method,
    pub variant: Variant,
    pub cells: Vec<CellOutcome>,
    pub unscheduled: Vec<Unscheduled>,
}

/// mutable allocation state for one trial
struct Slot {
    table: TableId,
    jobs: Vec<JobIdx>,
    rough: Vec<RoughPanel>,
    /// when-available: committed rough durations so far
    busy: Minutes,
}

struct Alloc {
    slots: Vec<Slot>,
    placed: Vec<bool>,
    reservations: Vec<Reservation>,
    blocked: BTreeMap<JobIdx, Reason>,
    /// cells reserved for class A under maximum-output
    dedicated: Vec<Color>,
    /// the single table gathering class E under maximum-output
    e_slot: Option<usize>,
}

/// the outer search. owns the validated jobs, their derived plans,
/// and the base resource pool with every on-table-today commitment
/// already applied; each method x variant run clones its own pool
/// snapshot and never observes the others.
pub struct Scheduler {
    jobs: Vec<Job>,
    plans: Vec<JobPlan>,
    cycles: CycleTable,
    inputs: RunInputs,
    base: ResourcePool,
    warnings: Vec<Warning>,
    preloads: BTreeMap<TableId, JobIdx>,
    rehome: Vec<JobIdx>,
    prereserved: BTreeMap<JobIdx, Reservation>,
}

impl Scheduler {
    pub fn new(
        jobs: Vec<Job>,
        cycles: CycleTable,
        calendar: &Calendar,
        inputs: RunInputs,
        mut pool: ResourcePool,
    ) -> Result<Self, Error> {
        if matches!(inputs.date.weekday(), Weekday::Sat | Weekday::Sun) {
            return Err(Error::field("date", "schedule date falls on a weekend"));
        }
        if !calendar.is_workday(inputs.date) {
            return Err(Error::field("date", "schedule date falls on a holiday"));
        }
        if !inputs.active.iter().any(|a| *a) {
            return Err(Error::NoFeasibleSchedule);
        }
        let plans = jobs
            .iter()
            .map(|job| JobPlan::derive(job, &cycles, calendar, inputs.date))
            .collect::<Result<Vec<_>, _>>()?;
        pool.molds.set_active(inputs.active);
        if inputs.orange_double2cc {
            pool.molds.admit_orange(MoldName::Double2cc);
        }
        if inputs.orange_3inurethane {
            pool.molds.admit_orange(MoldName::ThreeInUrethane);
        }
        if inputs.orange_deep_double2cc {
            pool.molds.admit_orange(MoldName::DeepDouble2cc);
        }
        let mut this = Self {
            jobs,
            plans,
            cycles,
            inputs,
            base: pool,
            warnings: vec![],
            preloads: BTreeMap::new(),
            rehome: vec![],
            prereserved: BTreeMap::new(),
        };
        this.check_supply()?;
        this.commit_overnight()?;
        Ok(this)
    }

    /// startup feasibility: a job whose mold or fixture requirement
    /// exceeds what the shop could ever supply, under every compliance
    /// and borrowing configuration, fails the run before any
    /// scheduling starts. jobs already sitting on a table are exempt;
    /// the floor has them whether the books like it or not.
    fn check_supply(&self) -> Result<(), Error> {
        for (job, plan) in self.jobs.iter().zip(self.plans.iter()) {
            if job.on_table.is_some() {
                continue;
            }
            if plan.fixture.is_some() && self.base.fixtures.capacity(job.pattern) == 0 {
                return Err(Error::ResourceExhausted(format!(
                    "job {}: pattern {} has no fixture capacity",
                    job.id, job.pattern
                )));
            }
            let eligible = Color::all()
                .iter()
                .filter(|c| self.inputs.active[c.index()])
                .filter(|c| **c != Color::Orange || job.orange_ok)
                .collect::<Vec<_>>();
            if eligible.is_empty() {
                continue;
            }
            let supplied = eligible.iter().any(|color| {
                requirement(plan.depth, job.mold_type, **color, job.molds)
                    .iter()
                    .all(|(name, want)| self.base.molds.reachable(*name, **color) >= *want)
            });
            if !supplied {
                return Err(Error::ResourceExhausted(format!(
                    "job {}: mold requirement can never be supplied",
                    job.id
                )));
            }
        }
        Ok(())
    }

    /// on-table-today jobs pre-reserve before any method runs: the
    /// operator has already committed molds and fixtures physically.
    fn commit_overnight(&mut self) -> Result<(), Error> {
        for idx in 0..self.jobs.len() {
            let Some(table) = self.jobs[idx].on_table else {
                continue;
            };
            if self.preloads.contains_key(&table) {
                return Err(Error::field(
                    format!("jobs[{}].on_table_today", idx),
                    format!("table {} is claimed twice", table),
                ));
            }
            let job = &self.jobs[idx];
            let plan = &self.plans[idx];
            if table.color == Color::Orange && !job.orange_ok {
                self.warnings.push(Warning::OrangeIneligible { job: job.id.clone() });
            }
            if !self.inputs.active[table.color.index()] {
                self.warnings.push(Warning::Rehomed {
                    job: job.id.clone(),
                    from: table,
                });
                self.rehome.push(idx);
            } else {
                self.preloads.insert(table, idx);
            }
            let row = self.row(idx);
            let day = RoughPanel::expand(idx, job, plan.qty, row, self.inputs.summer, true)
                .iter()
                .map(|p| p.dur.total())
                .sum::<Minutes>();
            if day > self.inputs.horizon() {
                self.warnings.push(Warning::ExceedsOneDay { job: job.id.clone() });
            }
            let (reservation, over) = self.base.prereserve(idx, job, plan, table);
            if over {
                self.warnings.push(Warning::Overcommitted { job: job.id.clone() });
            }
            self.prereserved.insert(idx, reservation);
        }
        Ok(())
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn rehome(&self) -> &[JobIdx] {
        &self.rehome
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn plans(&self) -> &[JobPlan] {
        &self.plans
    }

    fn row(&self, idx: JobIdx) -> &CycleRow {
        self.cycles
            .lookup(self.jobs[idx].wire, self.jobs[idx].equivalent)
            .expect("validated at derivation")
    }

    /// active cells in today's service order
    fn order(&self) -> Vec<Color> {
        Color::weekday_order(self.inputs.date.weekday())
            .into_iter()
            .filter(|c| self.inputs.active[c.index()])
            .collect()
    }

    /// every method under every enabled variant, each on its own
    /// snapshot of the resource pool
    pub fn explore(&self) -> Vec<Trial> {
        let combos = Method::all()
            .iter()
            .flat_map(|m| self.inputs.variants.iter().map(move |v| (*m, *v)))
            .collect::<Vec<_>>();
        combos
            .par_iter()
            .map(|(method, variant)| self.trial(*method, *variant))
            .collect()
    }

    fn trial(&self, method: Method, variant: Variant) -> Trial {
        log::debug!("exploring {} / {}", method, variant);
        let mut pool = self.base.clone();
        let mut alloc = self.seed(&pool);
        if method == Method::MaximumOutput {
            alloc.dedicated = self.dedicate(&alloc);
        }
        match variant {
            Variant::JobFirst => self.fill_job_first(method, &mut pool, &mut alloc),
            Variant::TableFirst => self.fill_table_first(method, &mut pool, &mut alloc),
            Variant::FixtureFirst => self.fill_fixture_first(method, &mut pool, &mut alloc),
        }
        let (cells, unscheduled) = self.simulate(&mut pool, alloc);
        Trial {
            method,
            variant,
            cells,
            unscheduled,
        }
    }

    /// fresh allocation with the on-table-today jobs already sitting
    /// at the head of their tables
    fn seed(&self, pool: &ResourcePool) -> Alloc {
        let mut slots = vec![];
        for color in self.order() {
            for side in Side::all() {
                slots.push(Slot {
                    table: TableId::new(color, *side),
                    jobs: vec![],
                    rough: vec![],
                    busy: 0,
                });
            }
        }
        let mut alloc = Alloc {
            slots,
            placed: vec![false; self.jobs.len()],
            reservations: vec![],
            blocked: BTreeMap::new(),
            dedicated: vec![],
            e_slot: None,
        };
        for (table, idx) in &self.preloads {
            let Some(s) = alloc.slots.iter().position(|s| s.table == *table) else {
                continue;
            };
            let rough = self.rough_for(*idx, *table, pool);
            let slot = &mut alloc.slots[s];
            slot.busy += rough.iter().map(|p| p.dur.total()).sum::<Minutes>();
            slot.rough.extend(rough);
            slot.jobs.push(*idx);
            alloc.placed[*idx] = true;
        }
        alloc
    }

    fn rough_for(&self, idx: JobIdx, table: TableId, pool: &ResourcePool) -> Vec<RoughPanel> {
        let job = &self.jobs[idx];
        let plan = &self.plans[idx];
        let in_place = plan
            .fixture
            .as_ref()
            .is_some_and(|f| pool.fixtures.same_as_previous_on_table(f, table));
        RoughPanel::expand(idx, job, plan.qty, self.row(idx), self.inputs.summer, in_place)
    }

    /// maximum-output dedication: one cell runs nothing but class A,
    /// two when the A surplus is deep enough. the cells with the most
    /// open time get the call.
    fn dedicate(&self, alloc: &Alloc) -> Vec<Color> {
        let h = self.inputs.horizon();
        let (a, rest) = (0..self.jobs.len())
            .filter(|i| !alloc.placed[*i])
            .fold((0i64, 0i64), |(a, rest), i| match self.plans[i].class {
                Class::A => (a + self.plans[i].qty as i64, rest),
                _ => (a, rest + self.plans[i].qty as i64),
            });
        let surplus = a - rest;
        let cells = match surplus < crate::SURPLUS_TWO_CELLS as i64 {
            true => 1,
            false => 2,
        };
        let mut ranked = self
            .order()
            .iter()
            .map(|color| {
                let open = alloc
                    .slots
                    .iter()
                    .filter(|s| s.table.color == *color)
                    .map(|s| h - s.busy)
                    .sum::<Minutes>();
                (*color, open)
            })
            .collect::<Vec<_>>();
        ranked.sort_by_key(|(_, open)| -open);
        ranked.into_iter().take(cells).map(|(c, _)| c).collect()
    }

    /// job ordering per method. re-homed jobs always come first: they
    /// must land at the first opportunity.
    fn ordered_jobs(&self, method: Method, alloc: &Alloc) -> Vec<JobIdx> {
        let mut jobs = (0..self.jobs.len())
            .filter(|i| !alloc.placed[*i])
            .collect::<Vec<_>>();
        let key = |i: &JobIdx| {
            let plan = &self.plans[*i];
            let rehomed = !self.rehome.contains(i);
            (rehomed, plan.priority, plan.build_date, *i)
        };
        match method {
            Method::PriorityFirst | Method::MaximumOutput => jobs.sort_by_key(key),
            Method::MinimumForcedIdle => jobs.sort_by(|a, b| {
                let (pa, pb) = (&self.plans[*a], &self.plans[*b]);
                (!self.rehome.contains(a), pa.priority)
                    .cmp(&(!self.rehome.contains(b), pb.priority))
                    .then_with(|| match pa.priority >= crate::shop::job::Priority::Expedited {
                        // past the urgent tiers, highest build load first
                        true => pb.load.total_cmp(&pa.load),
                        false => pa.build_date.cmp(&pb.build_date),
                    })
                    .then(a.cmp(b))
            }),
            Method::MostRestrictedMix => jobs.sort_by(|a, b| {
                let (pa, pb) = (&self.plans[*a], &self.plans[*b]);
                (!self.rehome.contains(a), pa.priority)
                    .cmp(&(!self.rehome.contains(b), pb.priority))
                    .then_with(|| pb.load.total_cmp(&pa.load))
                    .then(a.cmp(b))
            }),
        }
        jobs
    }

    /// admissible slots for a job, best first. the second return is
    /// true when pairing rules alone shut the job out this round.
    fn candidate_slots(
        &self,
        method: Method,
        idx: JobIdx,
        alloc: &Alloc,
        pool: &ResourcePool,
    ) -> (Vec<usize>, bool) {
        let h = self.inputs.horizon();
        let job = &self.jobs[idx];
        let plan = &self.plans[idx];
        let class = plan.class;
        let mut pairing_shut = false;
        let mut open = vec![];
        for (s, slot) in alloc.slots.iter().enumerate() {
            if slot.table.color == Color::Orange && !job.orange_ok {
                continue;
            }
            if slot.busy + self.row(idx).setup > h {
                continue;
            }
            match alloc.dedicated.contains(&slot.table.color) {
                true if class != Class::A => continue,
                _ => {}
            }
            let counterpart = self.classes(alloc, self.counterpart(alloc, s));
            if method.hard_pairing() && clash(class, &counterpart) {
                pairing_shut = true;
                continue;
            }
            open.push(s);
        }
        if method == Method::MostRestrictedMix && class.is_heavy() {
            // a restricted placement wants C across the aisle, falling
            // back to B, then A
            for want in [Class::C, Class::B, Class::A] {
                let paired = open
                    .iter()
                    .copied()
                    .filter(|s| {
                        self.classes(alloc, self.counterpart(alloc, *s)).contains(&want)
                    })
                    .collect::<Vec<_>>();
                if !paired.is_empty() {
                    open = paired;
                    break;
                }
                if want == Class::A {
                    pairing_shut = pairing_shut || !open.is_empty();
                    open.clear();
                }
            }
        }
        let fix = |s: &usize| {
            !plan.fixture.as_ref().is_some_and(|f| {
                pool.fixtures
                    .same_as_previous_on_table(f, alloc.slots[*s].table)
            })
        };
        match method {
            Method::PriorityFirst => open.sort_by_key(|s| {
                let counterpart = self.classes(alloc, self.counterpart(alloc, *s));
                let soft = clash(class, &counterpart);
                let light_on_heavy = (class == Class::A
                    && counterpart.iter().any(|c| *c >= Class::C))
                    || (class >= Class::C && counterpart.contains(&Class::A));
                (soft, !light_on_heavy, alloc.slots[*s].busy, fix(s), *s)
            }),
            Method::MinimumForcedIdle => open.sort_by_key(|s| {
                let slot = &alloc.slots[*s];
                let fits = (plan.load * h as f32) as Minutes <= h - slot.busy;
                (!fits, slot.busy, fix(s), *s)
            }),
            Method::MaximumOutput => open.sort_by_key(|s| {
                let counterpart = self.classes(alloc, self.counterpart(alloc, *s));
                let bb = class == Class::B && counterpart.contains(&Class::B);
                let b_opposite = (class == Class::B
                    && !counterpart.is_empty()
                    && !counterpart.contains(&Class::B))
                    || (class != Class::B && counterpart.contains(&Class::B));
                let away_from_e = class == Class::E && alloc.e_slot.is_some_and(|e| e != *s);
                (away_from_e, bb, !b_opposite, alloc.slots[*s].busy, fix(s), *s)
            }),
            Method::MostRestrictedMix => {
                open.sort_by_key(|s| (alloc.slots[*s].busy, fix(s), *s))
            }
        }
        (open, pairing_shut)
    }

    fn counterpart(&self, alloc: &Alloc, s: usize) -> usize {
        alloc
            .slots
            .iter()
            .position(|t| t.table == alloc.slots[s].table.counterpart())
            .expect("both sides of every active cell are slotted")
    }

    fn classes(&self, alloc: &Alloc, s: usize) -> Vec<Class> {
        alloc.slots[s]
            .jobs
            .iter()
            .map(|j| self.plans[*j].class)
            .collect()
    }

    /// reserve and place: all or nothing. a re-homed job that lands
    /// releases the hold it carried on its inactive table.
    fn commit(
        &self,
        pool: &mut ResourcePool,
        alloc: &mut Alloc,
        idx: JobIdx,
        s: usize,
    ) -> Result<(), Reason> {
        let table = alloc.slots[s].table;
        let rough = self.rough_for(idx, table, pool);
        let reservation = pool.reserve(idx, &self.jobs[idx], &self.plans[idx], table)?;
        if self.rehome.contains(&idx)
            && let Some(old) = self.prereserved.get(&idx)
        {
            pool.release(old);
        }
        alloc.reservations.push(reservation);
        let slot = &mut alloc.slots[s];
        slot.busy += rough.iter().map(|p| p.dur.total()).sum::<Minutes>();
        slot.rough.extend(rough);
        slot.jobs.push(idx);
        alloc.placed[idx] = true;
        if self.plans[idx].class == Class::E && alloc.e_slot.is_none() {
            alloc.e_slot = Some(s);
        }
        Ok(())
    }

    /// pick the next job in method order, then the best table for it.
    /// rounds repeat until a full pass places nothing.
    fn fill_job_first(&self, method: Method, pool: &mut ResourcePool, alloc: &mut Alloc) {
        loop {
            let mut progressed = false;
            for idx in self.ordered_jobs(method, alloc) {
                if alloc.placed[idx] {
                    continue;
                }
                let (candidates, pairing_shut) = self.candidate_slots(method, idx, alloc, pool);
                let mut landed = false;
                for s in &candidates {
                    match self.commit(pool, alloc, idx, *s) {
                        Ok(()) => {
                            landed = true;
                            progressed = true;
                            break;
                        }
                        Err(reason) => {
                            alloc.blocked.insert(idx, reason);
                        }
                    }
                }
                if !landed && candidates.is_empty() {
                    let reason = match pairing_shut {
                        true => Reason::ClassPairingBlocked,
                        false => Reason::NoCapacity,
                    };
                    alloc.blocked.insert(idx, reason);
                }
            }
            if !progressed {
                break;
            }
        }
    }

    /// walk the tables in weekday order, each visit taking the first
    /// compliant job in method order
    fn fill_table_first(&self, method: Method, pool: &mut ResourcePool, alloc: &mut Alloc) {
        loop {
            let mut progressed = false;
            for s in 0..alloc.slots.len() {
                for idx in self.ordered_jobs(method, alloc) {
                    let (candidates, _) = self.candidate_slots(method, idx, alloc, pool);
                    if !candidates.contains(&s) {
                        continue;
                    }
                    match self.commit(pool, alloc, idx, s) {
                        Ok(()) => {
                            progressed = true;
                            break;
                        }
                        Err(reason) => {
                            alloc.blocked.insert(idx, reason);
                        }
                    }
                }
            }
            if !progressed {
                break;
            }
        }
    }

    /// group jobs sharing a fixture id and run each group back to
    /// back on one table, reaping the zero setups
    fn fill_fixture_first(&self, method: Method, pool: &mut ResourcePool, alloc: &mut Alloc) {
        loop {
            let mut progressed = false;
            let order = self.ordered_jobs(method, alloc);
            let mut groups: Vec<Vec<JobIdx>> = vec![];
            let mut by_fixture: BTreeMap<FixtureId, usize> = BTreeMap::new();
            for idx in order {
                match &self.plans[idx].fixture {
                    Some(f) => match by_fixture.get(f).copied() {
                        Some(g) => groups[g].push(idx),
                        None => {
                            by_fixture.insert(f.clone(), groups.len());
                            groups.push(vec![idx]);
                        }
                    },
                    None => groups.push(vec![idx]),
                }
            }
            for group in groups {
                let lead = group[0];
                if alloc.placed[lead] {
                    continue;
                }
                let (candidates, pairing_shut) = self.candidate_slots(method, lead, alloc, pool);
                let Some(s) = candidates.first().copied() else {
                    if pairing_shut {
                        alloc.blocked.insert(lead, Reason::ClassPairingBlocked);
                    }
                    continue;
                };
                for idx in group {
                    let (candidates, _) = self.candidate_slots(method, idx, alloc, pool);
                    if !candidates.contains(&s) {
                        continue;
                    }
                    match self.commit(pool, alloc, idx, s) {
                        Ok(()) => progressed = true,
                        Err(reason) => {
                            alloc.blocked.insert(idx, reason);
                        }
                    }
                }
            }
            if !progressed {
                break;
            }
        }
    }

    /// hand each cell's queues to the alternation machine, then settle
    /// the books: jobs that produced nothing give their resources back
    /// and join the unscheduled list.
    fn simulate(&self, pool: &mut ResourcePool, alloc: Alloc) -> (Vec<CellOutcome>, Vec<Unscheduled>) {
        let h = self.inputs.horizon();
        let mut cells = vec![];
        for color in self.order() {
            let find = |side: Side| {
                alloc
                    .slots
                    .iter()
                    .find(|s| s.table == TableId::new(color, side))
                    .expect("active cell slotted")
            };
            let (one, two) = (find(Side::One), find(Side::Two));
            let preload = [Side::One, Side::Two].map(|side| {
                self.preloads
                    .get(&TableId::new(color, side))
                    .map(|idx| Preload {
                        job: *idx,
                        equivalent: self.jobs[*idx].equivalent,
                        qty: self.plans[*idx].qty,
                    })
            });
            let plan = CellPlan {
                color,
                queues: [one.rough.clone(), two.rough.clone()],
                preload,
            };
            let mut outcome = CellMachine::new(h).run(&plan);
            let local = one.jobs.iter().chain(two.jobs.iter()).collect::<Vec<_>>();
            outcome.borrows = pool
                .molds
                .borrows()
                .iter()
                .filter(|b| local.contains(&&b.job))
                .cloned()
                .collect();
            cells.push(outcome);
        }
        let mut produced = vec![false; self.jobs.len()];
        for cell in &cells {
            for panel in cell.panels() {
                produced[panel.job] = true;
            }
            for table in &cell.tables {
                if let Some(prep) = &table.prep {
                    produced[prep.job] = true;
                }
            }
        }
        for reservation in &alloc.reservations {
            if !produced[reservation.job] {
                pool.release(reservation);
            }
        }
        let mut unscheduled = vec![];
        for idx in 0..self.jobs.len() {
            if produced[idx] {
                continue;
            }
            let reason = match alloc.placed[idx] {
                // placed, then everything reverted at the cut-off
                true => Reason::NoCapacity,
                false => alloc.blocked.get(&idx).copied().unwrap_or(Reason::NoCapacity),
            };
            unscheduled.push(Unscheduled { job: idx, reason });
        }
        (cells, unscheduled)
    }
}
