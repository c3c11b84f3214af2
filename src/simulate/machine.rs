use super::outcome::CellOutcome;
use super::outcome::TableOutcome;
use super::panel::Panel;
use super::panel::PrepPanel;
use super::panel::RoughPanel;
use super::panel::Span;
use super::panel::Tasks;
use crate::JobIdx;
use crate::Minutes;
use crate::POUR_CUTOFF;
use crate::Qty;
use crate::shop::color::Color;
use crate::shop::table::Side;
use crate::shop::table::TableId;

/// what an on-table-today job left on a table overnight
#[derive(Debug, Clone, Copy)]
pub struct Preload {
    pub job: JobIdx,
    pub equivalent: f32,
    pub qty: Qty,
}

/// the ordered work one cell received from the driver: a rough-plan
/// panel queue per table, plus any overnight pre-loads
#[derive(Debug, Clone)]
pub struct CellPlan {
    pub color: Color,
    pub queues: [Vec<RoughPanel>; 2],
    pub preload: [Option<Preload>; 2],
}

/// a poured panel curing on its table, waiting for the operator to
/// come back and unload it
struct Pending {
    job: JobIdx,
    ordinal: u32,
    setup: Span,
    layout: Span,
    pour: Span,
    cure: Span,
    unload: Minutes,
}

/// live per-table state while the machine runs
struct Run {
    queue: Vec<RoughPanel>,
    cursor: usize,
    out: TableOutcome,
    pending: Option<Pending>,
    free_at: Minutes,
    closed: bool,
}

impl Run {
    fn new(id: TableId, queue: Vec<RoughPanel>) -> Self {
        Self {
            queue,
            cursor: 0,
            out: TableOutcome::new(id),
            pending: None,
            free_at: 0,
            closed: false,
        }
    }

    /// anything left for the operator here?
    fn live(&self) -> bool {
        self.pending.is_some() || (!self.closed && self.cursor < self.queue.len())
    }

    /// no further panels will start: remaining rough-plan panels
    /// revert to unassigned
    fn close(&mut self) {
        self.closed = true;
        let mut reverted = self.queue[self.cursor..]
            .iter()
            .map(|p| p.job)
            .collect::<Vec<_>>();
        reverted.dedup();
        for job in reverted {
            if !self.out.reverted.contains(&job) {
                self.out.reverted.push(job);
            }
        }
        self.cursor = self.queue.len();
    }
}

/// the two-table/one-operator interleave for a single cell.
///
/// three cursors advance monotonically from shift start: each table's
/// free-at and the shared operator clock. the operator carries a panel
/// through setup, layout and pour, leaves it curing, swings to the
/// counterpart table to unload and restart it, and comes back. cure is
/// the only task that runs unattended.
pub struct CellMachine {
    horizon: Minutes,
}

impl CellMachine {
    pub fn new(horizon: Minutes) -> Self {
        Self { horizon }
    }

    pub fn run(&self, plan: &CellPlan) -> CellOutcome {
        let mut queues = plan.queues.clone();
        let start = Self::preload(&mut queues, &plan.preload);
        let mut runs = [
            Run::new(TableId::new(plan.color, Side::One), queues[0].clone()),
            Run::new(TableId::new(plan.color, Side::Two), queues[1].clone()),
        ];
        let mut operator: Minutes = 0;
        let mut side = start.index();
        loop {
            if !runs[0].live() && !runs[1].live() {
                break;
            }
            if !runs[side].live() {
                side = 1 - side;
                continue;
            }
            let [a, b] = &mut runs;
            let (cur, oth) = match side {
                0 => (a, b),
                _ => (b, a),
            };
            Self::unload(cur, &mut operator);
            Self::advance(cur, oth.pending.is_some(), &mut operator, self.horizon);
            if oth.live() {
                side = 1 - side;
            }
        }
        let [one, two] = runs;
        CellOutcome {
            color: plan.color,
            tables: [one.out, two.out],
            borrows: vec![],
        }
    }

    /// apply the overnight state to the first panels and choose the
    /// table the operator opens on.
    ///
    /// a single pre-loaded table starts the shift at its pour. with
    /// both tables pre-loaded, the job with the lower equivalent has
    /// its layout already complete (ties: larger cure, then larger
    /// scheduling quantity); the other table opens at its layout.
    fn preload(queues: &mut [Vec<RoughPanel>; 2], loads: &[Option<Preload>; 2]) -> Side {
        match (&loads[0], &loads[1]) {
            (None, None) => Side::One,
            (Some(_), None) => {
                if let Some(first) = queues[0].first_mut() {
                    first.dur.setup = 0;
                    first.dur.layout = 0;
                }
                Side::One
            }
            (None, Some(_)) => {
                if let Some(first) = queues[1].first_mut() {
                    first.dur.setup = 0;
                    first.dur.layout = 0;
                }
                Side::Two
            }
            (Some(one), Some(two)) => {
                for queue in queues.iter_mut() {
                    if let Some(first) = queue.first_mut() {
                        first.dur.setup = 0;
                    }
                }
                let cures = [
                    queues[0].first().map(|p| p.dur.cure).unwrap_or(0),
                    queues[1].first().map(|p| p.dur.cure).unwrap_or(0),
                ];
                let poured = if one.equivalent != two.equivalent {
                    match one.equivalent < two.equivalent {
                        true => 0,
                        false => 1,
                    }
                } else if cures[0] != cures[1] {
                    match cures[0] > cures[1] {
                        true => 0,
                        false => 1,
                    }
                } else {
                    match one.qty >= two.qty {
                        true => 0,
                        false => 1,
                    }
                };
                if let Some(first) = queues[poured].first_mut() {
                    first.dur.layout = 0;
                }
                match poured {
                    0 => Side::One,
                    _ => Side::Two,
                }
            }
        }
    }

    /// unload the cured panel the operator finds on arrival. waiting
    /// for an unfinished cure is forced operator idle; a cure that
    /// finished before the operator returned left the table sitting,
    /// which is forced table idle.
    fn unload(cur: &mut Run, operator: &mut Minutes) {
        if let Some(p) = cur.pending.take() {
            // a pour the operator has not finished yet cannot be cured
            assert!(p.pour.end <= *operator, "operator double-booked");
            let start = if *operator < p.cure.end {
                cur.out.idle.operator += p.cure.end - *operator;
                p.cure.end
            } else {
                cur.out.idle.table += *operator - p.cure.end;
                *operator
            };
            let end = start + p.unload;
            *operator = end;
            cur.free_at = end;
            cur.out.panels.push(Panel {
                job: p.job,
                ordinal: p.ordinal,
                tasks: Tasks {
                    setup: p.setup,
                    layout: p.layout,
                    pour: p.pour,
                    cure: p.cure,
                    unload: Span::new(start, end),
                },
            });
        }
    }

    /// try to start the table's next rough-plan panel.
    ///
    /// pour needs strictly more than the cut-off left after layout;
    /// at the boundary the panel demotes to at most one prep panel
    /// (setup + layout for tomorrow), and only when the counterpart
    /// is not curing toward an unload the operator still owes it.
    fn advance(cur: &mut Run, counterpart_curing: bool, operator: &mut Minutes, horizon: Minutes) {
        if cur.closed || cur.cursor >= cur.queue.len() {
            return;
        }
        let rough = cur.queue[cur.cursor];
        let d = rough.dur;
        debug_assert!(cur.pending.is_none(), "table started over a curing panel");
        let op_start = (*operator).max(cur.free_at);
        if op_start >= horizon {
            cur.close();
            return;
        }
        let after_layout = op_start + d.setup + d.layout;
        if horizon - after_layout <= POUR_CUTOFF {
            let remaining = horizon - op_start;
            if remaining < POUR_CUTOFF
                && after_layout <= horizon
                && !counterpart_curing
                && cur.out.prep.is_none()
            {
                let setup = Span::new(op_start, op_start + d.setup);
                let layout = Span::new(setup.end, after_layout);
                *operator = after_layout;
                cur.free_at = after_layout;
                cur.out.prep = Some(PrepPanel {
                    job: rough.job,
                    ordinal: rough.ordinal,
                    setup,
                    layout,
                });
                cur.cursor += 1;
            }
            cur.close();
            return;
        }
        let op_end = after_layout + d.pour;
        let cure_end = op_end + d.cure;
        if cure_end + d.unload > horizon {
            cur.close();
            return;
        }
        let setup = Span::new(op_start, op_start + d.setup);
        let layout = Span::new(setup.end, after_layout);
        cur.pending = Some(Pending {
            job: rough.job,
            ordinal: rough.ordinal,
            setup,
            layout,
            pour: Span::new(after_layout, op_end),
            cure: Span::new(op_end, cure_end),
            unload: d.unload,
        });
        *operator = op_end;
        cur.free_at = cure_end;
        cur.cursor += 1;
    }
}
