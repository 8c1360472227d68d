use rust_decimal::Decimal;

use crate::models::{Entry, Event, Lift, LiftStatus};

/// Heaviest successful attempt, or zero.
pub fn best_final_kg(entry: &Entry, lift: Lift) -> Decimal {
    entry
        .attempts(lift)
        .iter()
        .filter(|a| a.status == LiftStatus::Success)
        .map(|a| a.weight_kg)
        .max()
        .unwrap_or(Decimal::ZERO)
}

/// Heaviest attempt that is either good or still to be taken, or zero.
pub fn best_projected_kg(entry: &Entry, lift: Lift) -> Decimal {
    entry
        .attempts(lift)
        .iter()
        .filter(|a| a.status != LiftStatus::Failure)
        .map(|a| a.weight_kg)
        .max()
        .unwrap_or(Decimal::ZERO)
}

/// Sum of best successful lifts for the event. Zero if any lift bombed out.
pub fn final_event_total_kg(entry: &Entry, event: Event) -> Decimal {
    event_total(entry, event, best_final_kg)
}

pub fn projected_event_total_kg(entry: &Entry, event: Event) -> Decimal {
    event_total(entry, event, best_projected_kg)
}

fn event_total(entry: &Entry, event: Event, best: fn(&Entry, Lift) -> Decimal) -> Decimal {
    let mut total = Decimal::ZERO;
    for lift in event.lifts() {
        let kg = best(entry, *lift);
        if kg <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        total += kg;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Attempt;

    fn attempt(kg: i64, status: LiftStatus) -> Attempt {
        Attempt {
            weight_kg: Decimal::from(kg),
            status,
        }
    }

    fn lifter() -> Entry {
        let mut entry = Entry::new(1);
        entry.events = vec![Event::SBD];
        entry.squat[0] = attempt(200, LiftStatus::Success);
        entry.squat[1] = attempt(210, LiftStatus::Failure);
        entry.squat[2] = attempt(210, LiftStatus::Success);
        entry.bench[0] = attempt(130, LiftStatus::Success);
        entry.bench[1] = attempt(137, LiftStatus::NotAttempted);
        entry.deadlift[0] = attempt(250, LiftStatus::NotAttempted);
        entry
    }

    #[test]
    fn test_best_lifts() {
        let entry = lifter();
        assert_eq!(best_final_kg(&entry, Lift::S), Decimal::from(210));
        assert_eq!(best_final_kg(&entry, Lift::B), Decimal::from(130));
        assert_eq!(best_projected_kg(&entry, Lift::B), Decimal::from(137));
        assert_eq!(best_final_kg(&entry, Lift::D), Decimal::ZERO);
    }

    #[test]
    fn test_event_totals() {
        let entry = lifter();
        assert_eq!(projected_event_total_kg(&entry, Event::SBD), Decimal::from(597));
        assert_eq!(final_event_total_kg(&entry, Event::SB), Decimal::from(340));
        // No good deadlift yet.
        assert_eq!(final_event_total_kg(&entry, Event::SBD), Decimal::ZERO);
    }

    #[test]
    fn test_bomb_out_totals_zero() {
        let mut entry = lifter();
        for slot in entry.bench.iter_mut() {
            slot.status = LiftStatus::Failure;
        }
        assert_eq!(projected_event_total_kg(&entry, Event::SBD), Decimal::ZERO);
        assert_eq!(final_event_total_kg(&entry, Event::S), Decimal::from(210));
    }
}
