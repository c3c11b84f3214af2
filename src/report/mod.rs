use crate::Error;
use crate::JobIdx;
use crate::Minutes;
use crate::cycles::Class;
use crate::search::Method;
use crate::search::Trial;
use crate::search::Variant;
use crate::shop::Job;
use crate::shop::JobPlan;
use serde::Deserialize;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// the rolled-up view of one trial the operator compares schedules by
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub method: Method,
    pub variant: Variant,
    pub panels_by_class: BTreeMap<Class, u32>,
    /// eligible jobs of each priority that got no panel
    pub missed_by_priority: [u32; 4],
    pub total_panels: u32,
    pub prep_panels: u32,
    pub idle_operator: Minutes,
    pub idle_table: Minutes,
}

impl Summary {
    pub fn of(trial: &Trial, plans: &[JobPlan]) -> Self {
        let mut panels_by_class = BTreeMap::new();
        let mut produced = vec![false; plans.len()];
        let mut total_panels = 0;
        let mut prep_panels = 0;
        for cell in &trial.cells {
            for panel in cell.panels() {
                produced[panel.job] = true;
                total_panels += 1;
                *panels_by_class.entry(plans[panel.job].class).or_insert(0) += 1;
            }
            prep_panels += cell.tables.iter().filter(|t| t.prep.is_some()).count() as u32;
        }
        let mut missed_by_priority = [0u32; 4];
        for (idx, plan) in plans.iter().enumerate() {
            if !produced[idx] {
                missed_by_priority[plan.priority.index()] += 1;
            }
        }
        Self {
            method: trial.method,
            variant: trial.variant,
            panels_by_class,
            missed_by_priority,
            total_panels,
            prep_panels,
            idle_operator: trial.cells.iter().map(|c| c.idle_operator()).sum(),
            idle_table: trial.cells.iter().map(|c| c.idle_table()).sum(),
        }
    }

    /// the comparator's headline number: misses among priorities 1-3
    pub fn missed_dates(&self) -> u32 {
        self.missed_by_priority[1..].iter().sum()
    }

    /// fewest missed dates wins; ties go to the bigger schedule
    pub fn rank(&self, other: &Self) -> Ordering {
        self.missed_dates()
            .cmp(&other.missed_dates())
            .then(other.total_panels.cmp(&self.total_panels))
    }
}

/// the full comparison: every method/variant summary, the best
/// variant per method, and one recommendation
#[derive(Debug)]
pub struct Report {
    pub trials: Vec<Trial>,
    pub summaries: Vec<Summary>,
    /// index into trials of each method's best variant
    pub champions: Vec<usize>,
    /// index into trials of the overall recommendation
    pub recommended: usize,
}

impl Report {
    pub fn compile(
        trials: Vec<Trial>,
        jobs: &[Job],
        plans: &[JobPlan],
        rehome: &[JobIdx],
    ) -> Result<Self, Error> {
        if trials.is_empty() {
            return Err(Error::NoFeasibleSchedule);
        }
        let summaries = trials
            .iter()
            .map(|t| Summary::of(t, plans))
            .collect::<Vec<_>>();
        if !jobs.is_empty() && summaries.iter().all(|s| s.total_panels == 0) {
            return Err(Error::NoFeasibleSchedule);
        }
        for idx in rehome {
            let stranded = trials
                .iter()
                .all(|t| t.unscheduled.iter().any(|u| u.job == *idx));
            if stranded {
                return Err(Error::InfeasibleOnTableToday(jobs[*idx].id.clone()));
            }
        }
        // earliest in variant order wins a dead tie
        let first_minimal = |candidates: &[usize]| {
            let mut best: Option<usize> = None;
            for i in candidates {
                match best {
                    Some(b) if summaries[*i].rank(&summaries[b]) != Ordering::Less => {}
                    _ => best = Some(*i),
                }
            }
            best
        };
        let mut champions = vec![];
        for method in Method::all() {
            let mine = (0..summaries.len())
                .filter(|i| summaries[*i].method == *method)
                .collect::<Vec<_>>();
            if let Some(i) = first_minimal(&mine) {
                champions.push(i);
            }
        }
        let recommended = first_minimal(&champions).expect("at least one trial ran");
        Ok(Self {
            trials,
            summaries,
            champions,
            recommended,
        })
    }

    pub fn recommended(&self) -> &Trial {
        &self.trials[self.recommended]
    }
}
