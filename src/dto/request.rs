use crate::Error;
use crate::N_CELLS;
use crate::Qty;
use crate::cycles::CycleTable;
use crate::resources::FixtureLedger;
use crate::resources::MoldBank;
use crate::resources::MoldName;
use crate::resources::ResourcePool;
use crate::resources::molds::MoldPool;
use crate::shop::Calendar;
use crate::shop::Job;
use crate::shop::TableId;
use crate::shop::job::MoldType;
use crate::shop::job::Pattern;
use chrono::NaiveDate;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

/// one row of the daily job load, as ingested. field shapes are
/// checked here, before any scheduling work begins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub required_by: NaiveDate,
    pub job_id: String,
    #[serde(default)]
    pub description: String,
    pub pattern: Pattern,
    pub opening_size: f32,
    pub wire_diameter: f32,
    pub molds: u32,
    pub mold_type: MoldType,
    pub production_quantity: Qty,
    pub equivalent: f32,
    pub orange_eligible: bool,
    #[serde(default)]
    pub on_table_today: Option<String>,
    #[serde(default)]
    pub job_quantity_remaining: Option<Qty>,
    #[serde(default)]
    pub expedite: Option<bool>,
}

impl JobRecord {
    pub fn validate(&self, row: usize) -> Result<Job, Error> {
        let place = |field: &str| format!("jobs[{}].{}", row, field);
        if !Job::valid_id(&self.job_id) {
            return Err(Error::field(
                place("job_id"),
                format!("{} does not match NNNNNN-NN-N", self.job_id),
            ));
        }
        if self.production_quantity < 1 {
            return Err(Error::field(place("production_quantity"), "must be at least 1"));
        }
        if self.molds < 1 {
            return Err(Error::field(place("molds"), "must be at least 1"));
        }
        if self.equivalent <= 0.0 {
            return Err(Error::field(place("equivalent"), "must be positive"));
        }
        if self.wire_diameter <= 0.0 {
            return Err(Error::field(place("wire_diameter"), "must be positive"));
        }
        if self.opening_size <= 0.0 {
            return Err(Error::field(place("opening_size"), "must be positive"));
        }
        let on_table = self
            .on_table_today
            .as_deref()
            .map(TableId::try_from)
            .transpose()
            .map_err(|_| {
                Error::field(
                    place("on_table_today"),
                    format!("{:?} is not one of the twelve tables", self.on_table_today),
                )
            })?;
        if let Some(remaining) = self.job_quantity_remaining {
            if remaining < 1 || remaining > self.production_quantity {
                return Err(Error::field(
                    place("job_quantity_remaining"),
                    "must be between 1 and the production quantity",
                ));
            }
            if on_table.is_none() {
                return Err(Error::field(
                    place("job_quantity_remaining"),
                    "only meaningful with on_table_today",
                ));
            }
        }
        Ok(Job {
            id: self.job_id.clone(),
            required_by: self.required_by,
            quantity: self.production_quantity,
            pattern: self.pattern,
            opening: self.opening_size,
            wire: self.wire_diameter,
            molds: self.molds,
            mold_type: self.mold_type,
            equivalent: self.equivalent,
            orange_ok: self.orange_eligible,
            on_table,
            remaining: self.job_quantity_remaining,
            expedite: self.expedite.unwrap_or(false),
        })
    }
}

/// one mold pool row of the constants workbook
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoldSpec {
    pub name: MoldName,
    pub quantity: usize,
    pub compliance: [bool; N_CELLS],
}

/// the four constants tables. every table has a built-in default, so
/// an empty file (or none at all) runs the stock shop.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConstantsFile {
    #[serde(default)]
    pub cycles: Option<CycleTable>,
    #[serde(default)]
    pub molds: Option<Vec<MoldSpec>>,
    #[serde(default)]
    pub fixtures: Option<BTreeMap<Pattern, usize>>,
    #[serde(default)]
    pub holidays: Vec<NaiveDate>,
}

impl ConstantsFile {
    pub fn build(self) -> (CycleTable, ResourcePool, Calendar) {
        let cycles = self.cycles.unwrap_or_default();
        let fixtures = match self.fixtures {
            Some(caps) => FixtureLedger::new(caps),
            None => FixtureLedger::default(),
        };
        let molds = match self.molds {
            Some(specs) => MoldBank::new(
                specs
                    .into_iter()
                    .map(|s| (s.name, MoldPool::new(s.quantity, s.compliance)))
                    .collect(),
            ),
            None => MoldBank::default(),
        };
        let pool = ResourcePool { fixtures, molds };
        (cycles, pool, Calendar::new(self.holidays))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> JobRecord {
        serde_json::from_str(
            r#"{
                "required_by": "2026-08-14",
                "job_id": "123456-01-1",
                "description": "vent panel",
                "pattern": "D",
                "opening_size": 0.25,
                "wire_diameter": 6.0,
                "molds": 3,
                "mold_type": "STANDARD",
                "production_quantity": 4,
                "equivalent": 1.0,
                "orange_eligible": true
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn round_trips_a_clean_record() {
        let job = record().validate(0).unwrap();
        assert!(job.id == "123456-01-1");
        assert!(job.quantity == 4);
        assert!(!job.expedite);
        assert!(job.on_table.is_none());
    }

    #[test]
    fn rejects_malformed_ids() {
        let mut r = record();
        r.job_id = "12345-01-1".into();
        assert!(matches!(
            r.validate(3),
            Err(Error::InvalidInputField { place, .. }) if place == "jobs[3].job_id"
        ));
    }

    #[test]
    fn rejects_remaining_without_table() {
        let mut r = record();
        r.job_quantity_remaining = Some(2);
        assert!(r.validate(0).is_err());
        r.on_table_today = Some("RED_1".into());
        let job = r.validate(0).unwrap();
        assert!(job.remaining == Some(2));
    }

    #[test]
    fn rejects_remaining_over_quantity() {
        let mut r = record();
        r.on_table_today = Some("RED_1".into());
        r.job_quantity_remaining = Some(5);
        assert!(r.validate(0).is_err());
    }

    #[test]
    fn rejects_unknown_table_names() {
        let mut r = record();
        r.on_table_today = Some("TEAL_1".into());
        assert!(r.validate(0).is_err());
    }

    #[test]
    fn empty_constants_build_the_stock_shop() {
        let (cycles, pool, _) = ConstantsFile::default().build();
        assert!(cycles.lookup(6.0, 1.0).is_ok());
        assert!(
            pool.molds
                .available(MoldName::Common, crate::shop::color::Color::Red)
                == 4
        );
    }

    #[test]
    fn mold_type_tokens_parse() {
        for token in ["STANDARD", "DOUBLE2CC", "3INURETHANE"] {
            let json = format!("\"{}\"", token);
            assert!(serde_json::from_str::<MoldType>(&json).is_ok());
        }
        assert!(serde_json::from_str::<MoldType>("\"URETHANE\"").is_err());
    }
}
