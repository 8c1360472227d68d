//! Bar loading for the loaders' display.
//!
//! Greedy, heaviest plate first, bounded by the pairs in the inventory. The
//! result is exact whenever the smallest plate divides every weight step the
//! meet uses; otherwise the unloadable remainder is reported in
//! [`BarLoad::residual_kg`] rather than silently lost.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use crate::models::{Lift, MeetState, PlatePairCount};

const KG_PER_LB: Decimal = Decimal::from_parts(45359237, 0, 0, false, 8);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedPlate {
    pub weight_kg: Decimal,
    /// Weight in the meet's display unit.
    pub weight_any: Decimal,
    pub color: String,
    /// Already on the bar from the previous load.
    pub is_already_loaded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarLoad {
    pub target_kg: Decimal,
    pub bar_and_collars_kg: Decimal,
    /// Plates for one side, heaviest (innermost) first.
    pub plates: Vec<LoadedPlate>,
    /// Per-side weight that could not be loaded with the inventory.
    pub residual_kg: Decimal,
}

impl BarLoad {
    pub fn per_side_kg(&self) -> Decimal {
        self.plates.iter().map(|p| p.weight_kg).sum()
    }

    pub fn is_exact(&self) -> bool {
        self.residual_kg.is_zero()
    }
}

pub fn select_plates(
    target_kg: Decimal,
    bar_and_collars_kg: Decimal,
    inventory: &[PlatePairCount],
    in_kg: bool,
) -> BarLoad {
    let mut remaining = (target_kg - bar_and_collars_kg) / Decimal::TWO;
    let mut plates = Vec::new();

    if remaining > Decimal::ZERO {
        let mut sizes: Vec<&PlatePairCount> = inventory
            .iter()
            .filter(|p| p.weight_kg > Decimal::ZERO && p.pair_count > 0)
            .collect();
        sizes.sort_by(|a, b| b.weight_kg.cmp(&a.weight_kg));

        for size in sizes {
            let fits = (remaining / size.weight_kg).floor().to_u32().unwrap_or(0);
            let count = fits.min(size.pair_count);
            for _ in 0..count {
                plates.push(LoadedPlate {
                    weight_kg: size.weight_kg,
                    weight_any: display_weight(size.weight_kg, in_kg),
                    color: size.color.clone(),
                    is_already_loaded: false,
                });
            }
            remaining -= size.weight_kg * Decimal::from(count);
        }
    }

    BarLoad {
        target_kg,
        bar_and_collars_kg,
        plates,
        residual_kg: remaining.normalize(),
    }
}

/// Loading for the given lift using the meet's bar weight and inventory.
pub fn bar_load_for(meet: &MeetState, lift: Lift, target_kg: Decimal) -> BarLoad {
    select_plates(target_kg, meet.bar_and_collars_kg(lift), &meet.plates, meet.in_kg)
}

/// Marks the plates of `next` that are already on the bar from `previous`,
/// matching position by position from the bar outward. A lighter `next`
/// means a full strip, so nothing is marked.
pub fn make_relative(previous: &BarLoad, mut next: BarLoad) -> BarLoad {
    if next.target_kg < previous.target_kg {
        return next;
    }
    for (old, new) in previous.plates.iter().zip(next.plates.iter_mut()) {
        if old.weight_kg != new.weight_kg {
            break;
        }
        new.is_already_loaded = true;
    }
    next
}

fn display_weight(weight_kg: Decimal, in_kg: bool) -> Decimal {
    if in_kg {
        weight_kg
    } else {
        (weight_kg / KG_PER_LB).round_dp(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_plates_kg;

    fn kg(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn weights(load: &BarLoad) -> Vec<Decimal> {
        load.plates.iter().map(|p| p.weight_kg).collect()
    }

    #[test]
    fn test_180_on_25_bar() {
        let load = select_plates(kg("180"), kg("25"), &default_plates_kg(), true);

        assert_eq!(weights(&load), vec![kg("25"), kg("25"), kg("25"), kg("2.5")]);
        assert_eq!(load.per_side_kg(), kg("77.5"));
        assert!(load.is_exact());
    }

    #[test]
    fn test_respects_pair_counts() {
        let inventory = vec![
            PlatePairCount::new(kg("25"), 2, "#DF4B4B"),
            PlatePairCount::new(kg("20"), 1, "#4D78D2"),
            PlatePairCount::new(kg("10"), 4, "#3E9D40"),
        ];
        let load = select_plates(kg("205"), kg("25"), &inventory, true);

        assert_eq!(
            weights(&load),
            vec![kg("25"), kg("25"), kg("20"), kg("10"), kg("10")]
        );
        assert!(load.is_exact());
    }

    #[test]
    fn test_residual_is_reported() {
        let load = select_plates(kg("100.3"), kg("25"), &default_plates_kg(), true);
        assert_eq!(load.per_side_kg(), kg("37.5"));
        assert_eq!(load.residual_kg, kg("0.15"));
        assert!(!load.is_exact());
    }

    #[test]
    fn test_target_below_bar() {
        let load = select_plates(kg("20"), kg("25"), &default_plates_kg(), true);
        assert!(load.plates.is_empty());
        assert!(load.residual_kg < Decimal::ZERO);
    }

    #[test]
    fn test_pounds_display() {
        let inventory = vec![PlatePairCount::new(kg("20.4116567"), 4, "#4D78D2")];
        let load = select_plates(kg("106.5"), kg("24.9"), &inventory, false);
        assert_eq!(load.plates[0].weight_any, kg("45.0"));
    }

    #[test]
    fn test_make_relative_marks_shared_plates() {
        let plates = default_plates_kg();
        let previous = select_plates(kg("180"), kg("25"), &plates, true);
        let next = select_plates(kg("185"), kg("25"), &plates, true);
        let next = make_relative(&previous, next);

        let loaded: Vec<bool> = next.plates.iter().map(|p| p.is_already_loaded).collect();
        assert_eq!(weights(&next), vec![kg("25"), kg("25"), kg("25"), kg("5")]);
        assert_eq!(loaded, vec![true, true, true, false]);
    }

    #[test]
    fn test_make_relative_lighter_is_fresh() {
        let plates = default_plates_kg();
        let previous = select_plates(kg("185"), kg("25"), &plates, true);
        let next = select_plates(kg("180"), kg("25"), &plates, true);
        let next = make_relative(&previous, next);
        assert!(next.plates.iter().all(|p| !p.is_already_loaded));
    }
}
