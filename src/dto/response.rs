use crate::Minutes;
use crate::report::Report;
use crate::report::Summary;
use crate::resources::Reason;
use crate::search::Method;
use crate::search::Trial;
use crate::search::Variant;
use crate::search::Warning;
use crate::shop::Job;
use crate::simulate::Tasks;
use serde::Deserialize;
use serde::Serialize;

/// one realised panel, with job ids spelled out for the floor sheet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelReport {
    pub job: String,
    pub panel: u32,
    pub tasks: Tasks,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepReport {
    pub job: String,
    pub panel: u32,
    pub setup: crate::simulate::Span,
    pub layout: crate::simulate::Span,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableReport {
    pub table: String,
    pub panels: Vec<PanelReport>,
    pub prep: Option<PrepReport>,
    pub forced_operator_idle: Minutes,
    pub forced_table_idle: Minutes,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BorrowReport {
    pub job: String,
    pub from: String,
    pub count: u32,
    pub to: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellReport {
    pub cell: String,
    pub tables: Vec<TableReport>,
    pub borrows: Vec<BorrowReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnscheduledReport {
    pub job: String,
    pub reason: Reason,
}

/// one method/variant schedule in full
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleReport {
    pub method: Method,
    pub variant: Variant,
    pub cells: Vec<CellReport>,
    pub unscheduled: Vec<UnscheduledReport>,
}

/// everything a run hands back: the recommended schedule, each
/// method's best, all summaries, and the warnings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub recommended: ScheduleReport,
    pub champions: Vec<ScheduleReport>,
    pub summaries: Vec<Summary>,
    pub warnings: Vec<Warning>,
}

impl ScheduleReport {
    fn of(trial: &Trial, jobs: &[Job]) -> Self {
        let name = |idx: usize| jobs[idx].id.clone();
        Self {
            method: trial.method,
            variant: trial.variant,
            cells: trial
                .cells
                .iter()
                .map(|cell| CellReport {
                    cell: cell.color.to_string(),
                    tables: cell
                        .tables
                        .iter()
                        .map(|t| TableReport {
                            table: t.id.to_string(),
                            panels: t
                                .panels
                                .iter()
                                .map(|p| PanelReport {
                                    job: name(p.job),
                                    panel: p.ordinal,
                                    tasks: p.tasks,
                                })
                                .collect(),
                            prep: t.prep.as_ref().map(|p| PrepReport {
                                job: name(p.job),
                                panel: p.ordinal,
                                setup: p.setup,
                                layout: p.layout,
                            }),
                            forced_operator_idle: t.idle.operator,
                            forced_table_idle: t.idle.table,
                        })
                        .collect(),
                    borrows: cell
                        .borrows
                        .iter()
                        .map(|b| BorrowReport {
                            job: name(b.job),
                            from: b.from.to_string(),
                            count: b.count,
                            to: b.to.to_string(),
                        })
                        .collect(),
                })
                .collect(),
            unscheduled: trial
                .unscheduled
                .iter()
                .map(|u| UnscheduledReport {
                    job: name(u.job),
                    reason: u.reason,
                })
                .collect(),
        }
    }
}

impl Response {
    pub fn of(report: &Report, jobs: &[Job], warnings: &[Warning]) -> Self {
        Self {
            recommended: ScheduleReport::of(report.recommended(), jobs),
            champions: report
                .champions
                .iter()
                .map(|i| ScheduleReport::of(&report.trials[*i], jobs))
                .collect(),
            summaries: report.summaries.clone(),
            warnings: warnings.to_vec(),
        }
    }
}
