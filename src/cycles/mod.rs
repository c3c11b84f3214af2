pub mod band;
pub mod class;
pub mod row;

pub use band::Band;
pub use class::Class;
pub use row::CycleRow;

use crate::Error;
use serde::Deserialize;
use serde::Serialize;

/// static task-duration lookup keyed by wire-diameter band and
/// equivalent tier. rows within a band are kept sorted ascending by
/// equivalent; a query between tiers rounds up to the next one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleTable {
    fine: Vec<CycleRow>,
    mid: Vec<CycleRow>,
    coarse: Vec<CycleRow>,
}

impl CycleTable {
    pub fn new(fine: Vec<CycleRow>, mid: Vec<CycleRow>, coarse: Vec<CycleRow>) -> Self {
        let mut table = Self { fine, mid, coarse };
        for band in [&mut table.fine, &mut table.mid, &mut table.coarse] {
            band.sort_by(|a, b| a.equivalent.total_cmp(&b.equivalent));
        }
        table
    }

    fn rows(&self, band: Band) -> &[CycleRow] {
        match band {
            Band::Fine => &self.fine,
            Band::Mid => &self.mid,
            Band::Coarse => &self.coarse,
        }
    }

    /// an equivalent between tabulated tiers rounds up to the next
    /// tier. an exact hit takes its own row. above the top tier the
    /// pair is absent and the lookup misses.
    pub fn lookup(&self, wire: f32, equivalent: f32) -> Result<&CycleRow, Error> {
        let band = Band::of(wire);
        self.rows(band)
            .iter()
            .find(|row| row.equivalent >= equivalent)
            .ok_or_else(|| {
                Error::ConstantsLookupMiss(format!(
                    "no cycle row for band {} equivalent {}",
                    band, equivalent
                ))
            })
    }
}

impl Default for CycleTable {
    fn default() -> Self {
        let row = CycleRow::new;
        Self::new(
            vec![
                row(0.5, 8, 20, 1, 12, 4, 3.2, Class::A, 0.0),
                row(1.0, 8, 22, 1, 15, 4, 3.0, Class::A, 0.0),
                row(1.5, 10, 24, 2, 16, 5, 2.8, Class::B, 0.5),
                row(2.0, 10, 26, 2, 18, 5, 2.6, Class::B, 0.5),
                row(3.0, 12, 30, 3, 20, 6, 2.2, Class::C, 1.0),
            ],
            vec![
                row(1.0, 10, 25, 2, 18, 5, 2.4, Class::B, 0.5),
                row(1.5, 12, 28, 2, 22, 6, 2.2, Class::C, 1.0),
                row(2.0, 12, 30, 3, 24, 6, 2.0, Class::C, 1.0),
                row(3.0, 14, 34, 3, 28, 7, 1.8, Class::D, 1.5),
            ],
            vec![
                row(1.0, 14, 30, 3, 26, 7, 1.8, Class::C, 1.0),
                row(2.0, 16, 34, 4, 30, 8, 1.6, Class::D, 1.5),
                row(3.0, 16, 38, 4, 34, 8, 1.4, Class::D, 2.0),
                row(4.0, 18, 42, 5, 38, 9, 1.2, Class::E, 2.5),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_tier_takes_its_own_row() {
        let table = CycleTable::default();
        let row = table.lookup(6.0, 1.0).unwrap();
        assert!(row.equivalent == 1.0);
        assert!(row.setup == 10);
        assert!(row.layout == 25);
        assert!(row.pour_per_mold == 2);
        assert!(row.cure_base == 18);
        assert!(row.unload == 5);
    }

    #[test]
    fn between_tiers_rounds_up() {
        let table = CycleTable::default();
        let row = table.lookup(6.0, 1.2).unwrap();
        assert!(row.equivalent == 1.5);
        assert!(row.class == Class::C);
    }

    #[test]
    fn above_top_tier_misses() {
        let table = CycleTable::default();
        assert!(matches!(
            table.lookup(6.0, 99.0),
            Err(Error::ConstantsLookupMiss(_))
        ));
    }

    #[test]
    fn bands_split_at_four_and_eight() {
        let table = CycleTable::default();
        assert!(table.lookup(4.0, 1.0).unwrap().constant == 3.0);
        assert!(table.lookup(5.0, 1.0).unwrap().constant == 2.4);
        assert!(table.lookup(8.0, 1.0).unwrap().constant == 1.8);
    }
}
