use meet::models::{Entry, Lift};
use meet::services::{BarLoad, bar_load_for, lifting_order_for, make_relative};
use meet::{EntryId, GlobalState};

use crate::dto::lifting::{
    BarLoadQuery, BarLoadResponse, LifterInfo, LiftingOrderResponse, PlateInfo,
};
use crate::error::{WebError, WebResult};

fn lifter_info(
    state: &GlobalState,
    entry_id: EntryId,
    attempt_one_indexed: u8,
) -> Option<LifterInfo> {
    let lift = state.lifting.lift;
    let entry: &Entry = state.registration.get(entry_id)?;
    let weight_kg = entry
        .attempts(lift)
        .get(usize::from(attempt_one_indexed).checked_sub(1)?)
        .map(|a| a.weight_kg)
        .unwrap_or_default();

    Some(LifterInfo {
        entry_id,
        name: entry.name.clone(),
        attempt_one_indexed,
        weight_kg,
        rack_info: entry.rack_info(lift).to_string(),
    })
}

pub fn lifting_order(state: &GlobalState) -> LiftingOrderResponse {
    let order = lifting_order_for(state);
    let current = order
        .current_entry_id
        .and_then(|id| lifter_info(state, id, order.attempt_one_indexed));
    let next = match (order.next_entry_id, order.next_attempt_one_indexed) {
        (Some(id), Some(attempt)) => lifter_info(state, id, attempt),
        _ => None,
    };

    LiftingOrderResponse {
        day: state.lifting.day,
        platform: state.lifting.platform,
        flight: state.lifting.flight.to_string(),
        lift: state.lifting.lift.to_string(),
        attempt_one_indexed: order.attempt_one_indexed,
        flight_complete: order.is_flight_complete(),
        ordered_entry_ids: order.ordered_entry_ids,
        current,
        next,
    }
}

pub fn bar_load(state: &GlobalState, query: &BarLoadQuery) -> WebResult<BarLoadResponse> {
    let lift: Lift = match &query.lift {
        Some(lift) => lift.parse()?,
        None => state.lifting.lift,
    };

    let target_kg = match query.weight_kg {
        Some(weight) => weight,
        None => {
            let order = lifting_order(state);
            order.current.map(|lifter| lifter.weight_kg).ok_or_else(|| {
                WebError::BadRequest("no lifter is up; weight_kg is required".to_string())
            })?
        }
    };

    let mut load = bar_load_for(&state.meet, lift, target_kg);
    if let Some(previous_kg) = query.previous_kg {
        let previous = bar_load_for(&state.meet, lift, previous_kg);
        load = make_relative(&previous, load);
    }

    Ok(to_response(lift, load))
}

fn to_response(lift: Lift, load: BarLoad) -> BarLoadResponse {
    BarLoadResponse {
        lift: lift.to_string(),
        target_kg: load.target_kg,
        bar_and_collars_kg: load.bar_and_collars_kg,
        per_side_kg: load.per_side_kg(),
        residual_kg: load.residual_kg,
        exact: load.is_exact(),
        plates: load
            .plates
            .into_iter()
            .map(|p| PlateInfo {
                weight_kg: p.weight_kg,
                weight_any: p.weight_any,
                color: p.color,
                is_already_loaded: p.is_already_loaded,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meet::actions::{
        Action, DeleteRegistration, EnterAttempt, EntryPatch, NewRegistration, OverrideEntryId,
    };
    use meet::models::Event;
    use rust_decimal::Decimal;

    fn state_with_lifter(weight_kg: i64) -> GlobalState {
        GlobalState::default()
            .apply(&Action::NewRegistration(NewRegistration {
                overwrite_defaults: EntryPatch {
                    name: Some("Ada".to_string()),
                    events: Some(vec![Event::SBD]),
                    ..Default::default()
                },
            }))
            .unwrap()
            .apply(&Action::EnterAttempt(EnterAttempt {
                entry_id: 1,
                lift: Lift::S,
                attempt_one_indexed: 1,
                weight_kg: Decimal::from(weight_kg),
            }))
            .unwrap()
    }

    #[test]
    fn test_lifting_order_reports_current_lifter() {
        let order = lifting_order(&state_with_lifter(140));
        let current = order.current.unwrap();

        assert_eq!(current.name, "Ada");
        assert_eq!(current.weight_kg, Decimal::from(140));
        assert_eq!(order.lift, "S");
        assert!(!order.flight_complete);
    }

    #[test]
    fn test_override_of_deleted_lifter_falls_back_to_order() {
        let state = state_with_lifter(140)
            .apply(&Action::NewRegistration(NewRegistration {
                overwrite_defaults: EntryPatch {
                    name: Some("Grace".to_string()),
                    events: Some(vec![Event::SBD]),
                    ..Default::default()
                },
            }))
            .unwrap()
            .apply(&Action::OverrideEntryId(OverrideEntryId { entry_id: Some(2) }))
            .unwrap()
            .apply(&Action::DeleteRegistration(DeleteRegistration { entry_id: 2 }))
            .unwrap();
        let order = lifting_order(&state);

        assert!(!order.flight_complete);
        assert_eq!(order.current.unwrap().name, "Ada");
    }

    #[test]
    fn test_bar_load_defaults_to_current_lifter() {
        let state = state_with_lifter(140);
        let query = BarLoadQuery {
            weight_kg: None,
            lift: None,
            previous_kg: None,
        };
        let load = bar_load(&state, &query).unwrap();

        assert_eq!(load.target_kg, Decimal::from(140));
        assert_eq!(load.per_side_kg, Decimal::new(575, 1));
        assert!(load.exact);
    }

    #[test]
    fn test_bar_load_marks_plates_already_loaded() {
        let state = state_with_lifter(140);
        let query = BarLoadQuery {
            weight_kg: Some(Decimal::from(150)),
            lift: Some("S".to_string()),
            previous_kg: Some(Decimal::from(140)),
        };
        let load = bar_load(&state, &query).unwrap();

        assert!(load.plates[0].is_already_loaded);
        assert!(!load.plates.last().unwrap().is_already_loaded);
    }

    #[test]
    fn test_bar_load_without_lifter_needs_weight() {
        let query = BarLoadQuery {
            weight_kg: None,
            lift: None,
            previous_kg: None,
        };
        assert!(matches!(
            bar_load(&GlobalState::default(), &query),
            Err(WebError::BadRequest(_))
        ));
    }
}
