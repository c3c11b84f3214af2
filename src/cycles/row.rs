use super::class::Class;
use crate::Minutes;
use serde::Deserialize;
use serde::Serialize;

/// one cycle-time row: the task durations and scheduling parameters
/// for every job falling on this (band, equivalent) tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleRow {
    pub equivalent: f32,
    pub setup: Minutes,
    pub layout: Minutes,
    pub pour_per_mold: Minutes,
    pub cure_base: Minutes,
    pub unload: Minutes,
    /// divisor turning quantity x equivalent into build load
    pub constant: f32,
    pub class: Class,
    /// extra business days subtracted ahead of the build date
    pub pull_ahead: f32,
}

impl CycleRow {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        equivalent: f32,
        setup: Minutes,
        layout: Minutes,
        pour_per_mold: Minutes,
        cure_base: Minutes,
        unload: Minutes,
        constant: f32,
        class: Class,
        pull_ahead: f32,
    ) -> Self {
        Self {
            equivalent,
            setup,
            layout,
            pour_per_mold,
            cure_base,
            unload,
            constant,
            class,
            pull_ahead,
        }
    }
}
