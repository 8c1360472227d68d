use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::kinds::{Equipment, Event, Flight, Lift, LiftStatus, Sex};

/// Process-unique entry identifier. Never reused after deletion.
pub type EntryId = u32;

/// Length of every attempt array. Whether the last slot is usable is decided
/// by the meet's `allow_4th_attempts` flag.
pub const MAX_ATTEMPTS: usize = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    pub weight_kg: Decimal,
    pub status: LiftStatus,
}

impl Attempt {
    /// Declared but not yet judged.
    pub fn is_pending(&self) -> bool {
        self.weight_kg > Decimal::ZERO && !self.status.is_judged()
    }
}

pub type Attempts = [Attempt; MAX_ATTEMPTS];

/// One registered competitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: EntryId,
    pub day: u32,
    pub platform: u32,
    pub flight: Flight,
    pub name: String,
    pub sex: Sex,
    pub birth_date: Option<NaiveDate>,
    pub age: u32,
    pub intended_weight_class_kg: String,
    pub equipment: Equipment,
    pub divisions: Vec<String>,
    pub events: Vec<Event>,
    /// 0 means no lot has been drawn.
    pub lot: u32,
    pub member_id: String,
    pub paid: bool,
    pub bodyweight_kg: Decimal,
    pub squat_rack_info: String,
    pub bench_rack_info: String,
    pub squat: Attempts,
    pub bench: Attempts,
    pub deadlift: Attempts,
}

impl Entry {
    pub fn new(id: EntryId) -> Self {
        Self {
            id,
            day: 1,
            platform: 1,
            flight: Flight::A,
            name: String::new(),
            sex: Sex::M,
            birth_date: None,
            age: 0,
            intended_weight_class_kg: String::new(),
            equipment: Equipment::Bare,
            divisions: Vec::new(),
            events: Vec::new(),
            lot: 0,
            member_id: String::new(),
            paid: false,
            bodyweight_kg: Decimal::ZERO,
            squat_rack_info: String::new(),
            bench_rack_info: String::new(),
            squat: Attempts::default(),
            bench: Attempts::default(),
            deadlift: Attempts::default(),
        }
    }

    pub fn attempts(&self, lift: Lift) -> &Attempts {
        match lift {
            Lift::S => &self.squat,
            Lift::B => &self.bench,
            Lift::D => &self.deadlift,
        }
    }

    pub fn attempts_mut(&mut self, lift: Lift) -> &mut Attempts {
        match lift {
            Lift::S => &mut self.squat,
            Lift::B => &mut self.bench,
            Lift::D => &mut self.deadlift,
        }
    }

    /// Whether any registered event includes the lift.
    pub fn competes_in(&self, lift: Lift) -> bool {
        self.events.iter().any(|event| event.has_lift(lift))
    }

    pub fn rack_info(&self, lift: Lift) -> &str {
        match lift {
            Lift::S => &self.squat_rack_info,
            Lift::B => &self.bench_rack_info,
            Lift::D => "",
        }
    }
}
