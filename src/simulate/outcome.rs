use super::panel::Panel;
use super::panel::PrepPanel;
use crate::JobIdx;
use crate::Minutes;
use crate::resources::Borrow;
use crate::resources::Reason;
use crate::shop::color::Color;
use crate::shop::table::TableId;
use serde::Deserialize;
use serde::Serialize;

/// forced waiting, split by who stood still
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Idle {
    /// operator waited on a cure
    pub operator: Minutes,
    /// a cured table waited on the operator
    pub table: Minutes,
}

/// one table's committed day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableOutcome {
    pub id: TableId,
    pub panels: Vec<Panel>,
    pub prep: Option<PrepPanel>,
    pub idle: Idle,
    /// jobs whose rough panels reverted to unassigned at the cut-off
    pub reverted: Vec<JobIdx>,
}

impl TableOutcome {
    pub fn new(id: TableId) -> Self {
        Self {
            id,
            panels: vec![],
            prep: None,
            idle: Idle::default(),
            reverted: vec![],
        }
    }
    /// jobs with at least one final-plan panel here
    pub fn scheduled(&self) -> Vec<JobIdx> {
        let mut jobs = self.panels.iter().map(|p| p.job).collect::<Vec<_>>();
        jobs.dedup();
        jobs
    }
}

/// a simulated cell: both tables plus the resource traffic the cell
/// generated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellOutcome {
    pub color: Color,
    pub tables: [TableOutcome; 2],
    pub borrows: Vec<Borrow>,
}

impl CellOutcome {
    pub fn panels(&self) -> impl Iterator<Item = &Panel> {
        self.tables.iter().flat_map(|t| t.panels.iter())
    }
    pub fn idle_operator(&self) -> Minutes {
        self.tables.iter().map(|t| t.idle.operator).sum()
    }
    pub fn idle_table(&self) -> Minutes {
        self.tables.iter().map(|t| t.idle.table).sum()
    }
}

/// a job the run could not place, with the blocking reason
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unscheduled {
    pub job: JobIdx,
    pub reason: Reason,
}
