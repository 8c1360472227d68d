use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entry::MAX_ATTEMPTS;
use super::kinds::{Formula, Lift, Sex};

pub const DEFAULT_PLATFORMS_ON_DAY: u32 = 1;
/// Upper bound on `length_days`, matching the SET_LENGTH_DAYS range.
pub const MAX_LENGTH_DAYS: u32 = 31;

/// Plates available to the loaders, counted in pairs (one per side).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatePairCount {
    pub weight_kg: Decimal,
    pub pair_count: u32,
    pub color: String,
}

impl PlatePairCount {
    pub fn new(weight_kg: Decimal, pair_count: u32, color: impl Into<String>) -> Self {
        Self {
            weight_kg,
            pair_count,
            color: color.into(),
        }
    }
}

/// Meet-wide configuration. There is exactly one per running instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetState {
    pub name: String,
    pub federation: String,
    pub date: Option<NaiveDate>,
    pub formula: Formula,
    pub length_days: u32,
    pub platforms_on_days: Vec<u32>,
    pub divisions: Vec<String>,
    pub weight_classes_kg_men: Vec<Decimal>,
    pub weight_classes_kg_women: Vec<Decimal>,
    pub weight_classes_kg_mx: Vec<Decimal>,
    pub in_kg: bool,
    pub squat_bar_and_collars_kg: Decimal,
    pub bench_bar_and_collars_kg: Decimal,
    pub deadlift_bar_and_collars_kg: Decimal,
    /// Sorted heaviest first.
    pub plates: Vec<PlatePairCount>,
    pub allow_4th_attempts: bool,
    pub combine_sleeves_and_wraps: bool,
}

impl Default for MeetState {
    fn default() -> Self {
        Self {
            name: String::new(),
            federation: String::new(),
            date: None,
            formula: Formula::default(),
            length_days: 1,
            platforms_on_days: vec![DEFAULT_PLATFORMS_ON_DAY],
            divisions: Vec::new(),
            weight_classes_kg_men: Vec::new(),
            weight_classes_kg_women: Vec::new(),
            weight_classes_kg_mx: Vec::new(),
            in_kg: true,
            squat_bar_and_collars_kg: Decimal::from(25),
            bench_bar_and_collars_kg: Decimal::from(25),
            deadlift_bar_and_collars_kg: Decimal::from(25),
            plates: default_plates_kg(),
            allow_4th_attempts: false,
            combine_sleeves_and_wraps: false,
        }
    }
}

impl MeetState {
    pub fn weight_classes(&self, sex: Sex) -> &[Decimal] {
        match sex {
            Sex::M => &self.weight_classes_kg_men,
            Sex::F => &self.weight_classes_kg_women,
            Sex::Mx => &self.weight_classes_kg_mx,
        }
    }

    pub fn weight_classes_mut(&mut self, sex: Sex) -> &mut Vec<Decimal> {
        match sex {
            Sex::M => &mut self.weight_classes_kg_men,
            Sex::F => &mut self.weight_classes_kg_women,
            Sex::Mx => &mut self.weight_classes_kg_mx,
        }
    }

    pub fn bar_and_collars_kg(&self, lift: Lift) -> Decimal {
        match lift {
            Lift::S => self.squat_bar_and_collars_kg,
            Lift::B => self.bench_bar_and_collars_kg,
            Lift::D => self.deadlift_bar_and_collars_kg,
        }
    }

    pub fn bar_and_collars_kg_mut(&mut self, lift: Lift) -> &mut Decimal {
        match lift {
            Lift::S => &mut self.squat_bar_and_collars_kg,
            Lift::B => &mut self.bench_bar_and_collars_kg,
            Lift::D => &mut self.deadlift_bar_and_collars_kg,
        }
    }

    /// Number of attempt slots that may be used at this meet.
    pub fn max_attempts(&self) -> u8 {
        if self.allow_4th_attempts {
            MAX_ATTEMPTS as u8
        } else {
            MAX_ATTEMPTS as u8 - 1
        }
    }

    /// Inserts or replaces a plate size, keeping the inventory heaviest first.
    pub fn upsert_plate(&mut self, plate: PlatePairCount) {
        match self
            .plates
            .iter_mut()
            .find(|p| p.weight_kg == plate.weight_kg)
        {
            Some(existing) => *existing = plate,
            None => self.plates.push(plate),
        }
        self.plates.sort_by(|a, b| b.weight_kg.cmp(&a.weight_kg));
    }
}

/// The standard kilogram inventory: 25s through 0.25s, colored per IPF rules.
pub fn default_plates_kg() -> Vec<PlatePairCount> {
    [
        (50, 0, 0, "#000000"),
        (25, 0, 8, "#DF4B4B"),
        (20, 0, 1, "#4D78D2"),
        (15, 0, 1, "#E6D53A"),
        (10, 0, 1, "#3E9D40"),
        (5, 0, 1, "#FFFFFF"),
        (25, 1, 1, "#000000"),
        (125, 2, 1, "#C0C0C0"),
        (1, 0, 1, "#C0C0C0"),
        (75, 2, 1, "#C0C0C0"),
        (5, 1, 1, "#C0C0C0"),
        (25, 2, 1, "#C0C0C0"),
    ]
    .into_iter()
    .map(|(mantissa, scale, pairs, color)| {
        PlatePairCount::new(Decimal::new(mantissa, scale), pairs, color)
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_plates_sorted_heaviest_first() {
        let plates = default_plates_kg();
        assert!(plates.windows(2).all(|w| w[0].weight_kg > w[1].weight_kg));
        assert_eq!(plates.last().unwrap().weight_kg, Decimal::new(25, 2));
    }

    #[test]
    fn test_upsert_plate_replaces_and_sorts() {
        let mut meet = MeetState::default();
        let count = meet.plates.len();

        meet.upsert_plate(PlatePairCount::new(Decimal::from(25), 4, "#DF4B4B"));
        assert_eq!(meet.plates.len(), count);
        assert_eq!(meet.plates[1].pair_count, 4);

        meet.upsert_plate(PlatePairCount::new(Decimal::new(5, 1), 2, "#C0C0C0"));
        assert_eq!(meet.plates.len(), count);

        meet.upsert_plate(PlatePairCount::new(Decimal::from(45), 2, "#123456"));
        assert_eq!(meet.plates.len(), count + 1);
        assert_eq!(meet.plates[1].weight_kg, Decimal::from(45));
    }

    #[test]
    fn test_max_attempts() {
        let mut meet = MeetState::default();
        assert_eq!(meet.max_attempts(), 3);
        meet.allow_4th_attempts = true;
        assert_eq!(meet.max_attempts(), 4);
    }
}
