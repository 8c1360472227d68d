//! Who is lifting now, and who is up next.
//!
//! Order within an attempt round is ascending requested weight, then lot
//! number (undrawn lots last), then entry id. The real rules also look at
//! the order in which weights were declared; that is not modelled here.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Attempt, Entry, EntryId, GlobalState, Lift, LiftingState, MAX_ATTEMPTS};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiftingOrder {
    /// Entries still to lift in the active round, in lifting order.
    pub ordered_entry_ids: Vec<EntryId>,
    pub attempt_one_indexed: u8,
    /// `None` once the flight is complete.
    pub current_entry_id: Option<EntryId>,
    pub next_attempt_one_indexed: Option<u8>,
    pub next_entry_id: Option<EntryId>,
}

impl LiftingOrder {
    pub fn is_flight_complete(&self) -> bool {
        self.current_entry_id.is_none()
    }
}

/// Entries of the group on the platform that take the active lift.
pub fn entries_in_flight(state: &GlobalState) -> Vec<&Entry> {
    let lifting = &state.lifting;
    state
        .registration
        .entries
        .iter()
        .filter(|e| {
            e.day == lifting.day
                && e.platform == lifting.platform
                && e.flight == lifting.flight
                && e.competes_in(lifting.lift)
        })
        .collect()
}

/// Lifting order for the group described by `lifting`.
pub fn get_lifting_order(
    entries: &[&Entry],
    lifting: &LiftingState,
    max_attempts: u8,
) -> LiftingOrder {
    let lift = lifting.lift;
    let max_attempts = max_attempts.clamp(1, MAX_ATTEMPTS as u8);
    let eligible: Vec<&Entry> = entries
        .iter()
        .copied()
        .filter(|e| e.competes_in(lift))
        .collect();

    let computed = (1..=max_attempts).find(|&n| eligible.iter().any(|e| is_pending(e, lift, n)));
    let attempt = lifting
        .override_attempt
        .or(computed)
        .unwrap_or_else(|| last_judged_attempt(&eligible, lift, max_attempts));

    let ordered = if lifting.override_attempt.is_some() {
        order_round(&eligible, lift, attempt, |e| has_declared(e, lift, attempt))
    } else {
        order_round(&eligible, lift, attempt, |e| is_pending(e, lift, attempt))
    };

    let current = lifting
        .override_entry_id
        .filter(|id| entries.iter().any(|e| e.id == *id))
        .or_else(|| ordered.first().map(|e| e.id));

    let mut next = None;
    if let Some(current) = current {
        let following = match ordered.iter().position(|e| e.id == current) {
            Some(pos) => ordered.get(pos + 1),
            None => ordered.iter().find(|e| e.id != current),
        };
        next = following.map(|e| (attempt, e.id));
    }
    if next.is_none() && current.is_some() {
        next = ((attempt + 1)..=max_attempts).find_map(|n| {
            order_round(&eligible, lift, n, |e| is_pending(e, lift, n))
                .first()
                .map(|e| (n, e.id))
        });
    }

    LiftingOrder {
        ordered_entry_ids: ordered.iter().map(|e| e.id).collect(),
        attempt_one_indexed: attempt,
        current_entry_id: current,
        next_attempt_one_indexed: next.map(|(n, _)| n),
        next_entry_id: next.map(|(_, id)| id),
    }
}

/// Convenience over a whole snapshot.
pub fn lifting_order_for(state: &GlobalState) -> LiftingOrder {
    let entries = entries_in_flight(state);
    get_lifting_order(&entries, &state.lifting, state.meet.max_attempts())
}

fn slot(entry: &Entry, lift: Lift, attempt: u8) -> Option<&Attempt> {
    entry.attempts(lift).get(usize::from(attempt).checked_sub(1)?)
}

fn is_pending(entry: &Entry, lift: Lift, attempt: u8) -> bool {
    slot(entry, lift, attempt).is_some_and(|a| a.is_pending())
}

fn has_declared(entry: &Entry, lift: Lift, attempt: u8) -> bool {
    slot(entry, lift, attempt).is_some_and(|a| a.weight_kg > Decimal::ZERO)
}

fn last_judged_attempt(entries: &[&Entry], lift: Lift, max_attempts: u8) -> u8 {
    (1..=max_attempts)
        .rev()
        .find(|&n| {
            entries
                .iter()
                .any(|e| slot(e, lift, n).is_some_and(|a| a.status.is_judged()))
        })
        .unwrap_or(1)
}

fn order_round<'a>(
    entries: &[&'a Entry],
    lift: Lift,
    attempt: u8,
    include: impl Fn(&Entry) -> bool,
) -> Vec<&'a Entry> {
    let mut round: Vec<&Entry> = entries.iter().copied().filter(|e| include(e)).collect();
    round.sort_by_key(|e| {
        let weight = slot(e, lift, attempt).map(|a| a.weight_kg).unwrap_or_default();
        let lot = if e.lot == 0 { u32::MAX } else { e.lot };
        (weight, lot, e.id)
    });
    round
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Event, Flight, LiftStatus};
    use LiftStatus::{Failure, NotAttempted as Open, Success};

    fn entry(id: EntryId, lot: u32, squats: &[(i64, LiftStatus)]) -> Entry {
        let mut entry = Entry::new(id);
        entry.events = vec![Event::SBD];
        entry.lot = lot;
        for (i, (kg, status)) in squats.iter().enumerate() {
            entry.squat[i].weight_kg = Decimal::from(*kg);
            entry.squat[i].status = *status;
        }
        entry
    }

    #[test]
    fn test_orders_by_weight_then_lot() {
        let a = entry(1, 5, &[(200, Open)]);
        let b = entry(2, 3, &[(180, Open)]);
        let c = entry(3, 1, &[(200, Open)]);
        let order = get_lifting_order(&[&a, &b, &c], &LiftingState::default(), 3);

        assert_eq!(order.attempt_one_indexed, 1);
        assert_eq!(order.ordered_entry_ids, vec![2, 3, 1]);
        assert_eq!(order.current_entry_id, Some(2));
        assert_eq!(order.next_entry_id, Some(3));
        assert_eq!(order.next_attempt_one_indexed, Some(1));
    }

    #[test]
    fn test_undrawn_lot_goes_last() {
        let a = entry(1, 0, &[(100, Open)]);
        let b = entry(2, 9, &[(100, Open)]);
        let order = get_lifting_order(&[&a, &b], &LiftingState::default(), 3);
        assert_eq!(order.ordered_entry_ids, vec![2, 1]);
    }

    #[test]
    fn test_active_attempt_is_lowest_open_round() {
        let a = entry(1, 1, &[(100, Success), (110, Open)]);
        let b = entry(2, 2, &[(120, Open)]);
        let order = get_lifting_order(&[&a, &b], &LiftingState::default(), 3);

        assert_eq!(order.attempt_one_indexed, 1);
        assert_eq!(order.current_entry_id, Some(2));
        // Round one is exhausted after entry 2, so next looks ahead.
        assert_eq!(order.next_attempt_one_indexed, Some(2));
        assert_eq!(order.next_entry_id, Some(1));
    }

    #[test]
    fn test_flight_complete() {
        let judged = [(100, Success), (110, Failure), (110, Success)];
        let a = entry(1, 1, &judged);
        let b = entry(2, 2, &judged);
        let c = entry(3, 3, &judged);
        let order = get_lifting_order(&[&a, &b, &c], &LiftingState::default(), 3);

        assert!(order.is_flight_complete());
        assert_eq!(order.current_entry_id, None);
        assert_eq!(order.next_entry_id, None);
        assert!(order.ordered_entry_ids.is_empty());
        assert_eq!(order.attempt_one_indexed, 3);
    }

    #[test]
    fn test_override_entry_forces_current() {
        let a = entry(1, 1, &[(100, Open)]);
        let b = entry(2, 2, &[(120, Open)]);
        let lifting = LiftingState {
            override_entry_id: Some(2),
            ..Default::default()
        };
        let order = get_lifting_order(&[&a, &b], &lifting, 3);

        assert_eq!(order.current_entry_id, Some(2));
        assert_eq!(order.next_entry_id, None);
    }

    #[test]
    fn test_override_entry_outside_group_is_ignored() {
        let a = entry(1, 1, &[(100, Open)]);
        let b = entry(2, 2, &[(120, Open)]);
        let lifting = LiftingState {
            override_entry_id: Some(9),
            ..Default::default()
        };
        let order = get_lifting_order(&[&a, &b], &lifting, 3);

        assert_eq!(order.current_entry_id, Some(1));
        assert_eq!(order.next_entry_id, Some(2));
        assert!(!order.is_flight_complete());
    }

    #[test]
    fn test_override_attempt_shows_judged_round() {
        let a = entry(1, 1, &[(100, Success), (110, Open)]);
        let b = entry(2, 2, &[(90, Failure), (95, Open)]);
        let lifting = LiftingState {
            override_attempt: Some(1),
            ..Default::default()
        };
        let order = get_lifting_order(&[&a, &b], &lifting, 3);

        assert_eq!(order.attempt_one_indexed, 1);
        assert_eq!(order.ordered_entry_ids, vec![2, 1]);
        assert_eq!(order.current_entry_id, Some(2));
    }

    #[test]
    fn test_order_is_repeatable() {
        let a = entry(1, 4, &[(150, Open)]);
        let b = entry(2, 2, &[(150, Open)]);
        let c = entry(3, 0, &[(140, Open)]);
        let first = get_lifting_order(&[&a, &b, &c], &LiftingState::default(), 3);
        let again = get_lifting_order(&[&c, &b, &a], &LiftingState::default(), 3);
        assert_eq!(first, again);
    }

    #[test]
    fn test_entries_in_flight_filters_group_and_lift() {
        let mut state = GlobalState::default();
        let mut bench_only = entry(1, 1, &[]);
        bench_only.events = vec![Event::B];
        let mut other_flight = entry(2, 2, &[(100, Open)]);
        other_flight.flight = Flight::B;
        let in_group = entry(3, 3, &[(100, Open)]);
        state.registration.entries = vec![bench_only, other_flight, in_group];
        state.registration.next_entry_id = 4;
        state.registration.rebuild_lookup();

        let ids: Vec<EntryId> = entries_in_flight(&state).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3]);
        assert_eq!(lifting_order_for(&state).current_entry_id, Some(3));
    }
}
