//! Division placement: group entries into competition categories and rank
//! each category.
//!
//! Within a category, the higher total wins, then the lighter bodyweight.
//! Remaining ties fall back to the lifter's name. Proper tie-breaking uses
//! the order in which the total was achieved, which is not modelled.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::totals::{final_event_total_kg, projected_event_total_kg};
use crate::error::{MeetError, Result};
use crate::models::{Entry, EntryId, Equipment, Event, MeetState, Sex};

/// A bodyweight bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum WeightClass {
    /// Bodyweight at or below the bound.
    UpTo(Decimal),
    /// Above the heaviest bound (superheavyweight).
    Over(Decimal),
    /// No classes configured, or not weighed in yet.
    Unassigned,
}

impl WeightClass {
    /// First bound at or above `bodyweight_kg`; `classes_kg` must ascend.
    pub fn for_bodyweight(classes_kg: &[Decimal], bodyweight_kg: Decimal) -> Self {
        if bodyweight_kg <= Decimal::ZERO {
            return Self::Unassigned;
        }
        match classes_kg.iter().find(|&&bound| bodyweight_kg <= bound) {
            Some(bound) => Self::UpTo(*bound),
            None => classes_kg
                .last()
                .map_or(Self::Unassigned, |bound| Self::Over(*bound)),
        }
    }

    fn sort_key(&self) -> (u8, Decimal, u8) {
        match self {
            Self::UpTo(bound) => (0, *bound, 0),
            Self::Over(bound) => (0, *bound, 1),
            Self::Unassigned => (1, Decimal::ZERO, 0),
        }
    }
}

impl Ord for WeightClass {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for WeightClass {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for WeightClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UpTo(bound) => write!(f, "{}", bound.normalize()),
            Self::Over(bound) => write!(f, "{}+", bound.normalize()),
            Self::Unassigned => Ok(()),
        }
    }
}

impl FromStr for WeightClass {
    type Err = MeetError;

    fn from_str(s: &str) -> Result<Self> {
        let parse = |v: &str| {
            Decimal::from_str(v)
                .map_err(|_| MeetError::InvalidCategoryKey(format!("bad weight class '{}'", s)))
        };
        if s.is_empty() {
            Ok(Self::Unassigned)
        } else if let Some(bound) = s.strip_suffix('+') {
            Ok(Self::Over(parse(bound)?))
        } else {
            Ok(Self::UpTo(parse(s)?))
        }
    }
}

impl From<WeightClass> for String {
    fn from(class: WeightClass) -> Self {
        class.to_string()
    }
}

impl TryFrom<String> for WeightClass {
    type Error = MeetError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// A group of entries ranked against each other.
///
/// Ordered for presentation: sex, event, equipment, weight class, division.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub sex: Sex,
    pub event: Event,
    pub equipment: Equipment,
    pub division: String,
    pub weight_class: WeightClass,
}

impl Ord for Category {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sex
            .sort_order()
            .cmp(&other.sex.sort_order())
            .then_with(|| self.event.sort_order().cmp(&other.event.sort_order()))
            .then_with(|| {
                self.equipment
                    .sort_order()
                    .cmp(&other.equipment.sort_order())
            })
            .then_with(|| self.weight_class.cmp(&other.weight_class))
            .then_with(|| self.division.cmp(&other.division))
    }
}

impl PartialOrd for Category {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Key form `sex/event/equipment/class/division`. The division comes last so
/// it may itself contain slashes.
impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}/{}",
            self.sex, self.event, self.equipment, self.weight_class, self.division
        )
    }
}

impl FromStr for Category {
    type Err = MeetError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.splitn(5, '/').collect();
        let [sex, event, equipment, weight_class, division] = parts.as_slice() else {
            return Err(MeetError::InvalidCategoryKey(s.to_string()));
        };
        let bad = |_| MeetError::InvalidCategoryKey(s.to_string());
        Ok(Self {
            sex: sex.parse().map_err(bad)?,
            event: event.parse().map_err(bad)?,
            equipment: equipment.parse().map_err(bad)?,
            weight_class: weight_class.parse()?,
            division: division.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultsType {
    /// Best good lifts only.
    #[default]
    Final,
    /// Best good or still-to-come lifts.
    Projected,
}

impl ResultsType {
    pub fn total_kg(&self, entry: &Entry, event: Event) -> Decimal {
        match self {
            Self::Final => final_event_total_kg(entry, event),
            Self::Projected => projected_event_total_kg(entry, event),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResults {
    pub category: Category,
    /// First place first.
    pub ordered_entries: Vec<Entry>,
}

impl CategoryResults {
    /// 1-based place of an entry in this category.
    pub fn place(&self, entry_id: EntryId) -> Option<usize> {
        self.ordered_entries
            .iter()
            .position(|e| e.id == entry_id)
            .map(|idx| idx + 1)
    }
}

/// Every populated category, in presentation order, each ranked.
pub fn get_all_results(
    entries: &[Entry],
    meet: &MeetState,
    results_type: ResultsType,
) -> Vec<CategoryResults> {
    let mut buckets: BTreeMap<Category, Vec<&Entry>> = BTreeMap::new();

    for entry in entries {
        let weight_class =
            WeightClass::for_bodyweight(meet.weight_classes(entry.sex), entry.bodyweight_kg);
        let equipment = match entry.equipment {
            Equipment::Sleeves if meet.combine_sleeves_and_wraps => Equipment::Wraps,
            other => other,
        };

        for division in &entry.divisions {
            for event in &entry.events {
                let category = Category {
                    sex: entry.sex,
                    event: *event,
                    equipment,
                    division: division.clone(),
                    weight_class,
                };
                buckets.entry(category).or_default().push(entry);
            }
        }
    }

    buckets
        .into_iter()
        .map(|(category, mut members)| {
            members.sort_by(|a, b| {
                let a_total = results_type.total_kg(a, category.event);
                let b_total = results_type.total_kg(b, category.event);
                b_total
                    .cmp(&a_total)
                    .then_with(|| a.bodyweight_kg.cmp(&b.bodyweight_kg))
                    .then_with(|| a.name.cmp(&b.name))
            });
            CategoryResults {
                category,
                ordered_entries: members.into_iter().cloned().collect(),
            }
        })
        .collect()
}

pub fn get_final_results(entries: &[Entry], meet: &MeetState) -> Vec<CategoryResults> {
    get_all_results(entries, meet, ResultsType::Final)
}

pub fn get_projected_results(entries: &[Entry], meet: &MeetState) -> Vec<CategoryResults> {
    get_all_results(entries, meet, ResultsType::Projected)
}
