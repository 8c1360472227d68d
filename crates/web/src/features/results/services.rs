use meet::GlobalState;
use meet::services::{CategoryResults, ResultsType, get_all_results};

use crate::dto::results::{CategoryResultsResponse, PlacedEntry, ResultsResponse};

fn category_to_response(
    results: CategoryResults,
    results_type: ResultsType,
) -> CategoryResultsResponse {
    let category = &results.category;
    let entries = results
        .ordered_entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| PlacedEntry {
            place: idx + 1,
            entry_id: entry.id,
            name: entry.name.clone(),
            bodyweight_kg: entry.bodyweight_kg,
            total_kg: results_type.total_kg(entry, category.event),
        })
        .collect();

    CategoryResultsResponse {
        key: category.to_string(),
        sex: category.sex.to_string(),
        event: category.event.to_string(),
        equipment: category.equipment.to_string(),
        weight_class: category.weight_class.to_string(),
        division: category.division.clone(),
        entries,
    }
}

pub fn results(state: &GlobalState, results_type: ResultsType) -> ResultsResponse {
    let categories = get_all_results(&state.registration.entries, &state.meet, results_type)
        .into_iter()
        .map(|r| category_to_response(r, results_type))
        .collect();

    ResultsResponse {
        results_type: match results_type {
            ResultsType::Final => "final",
            ResultsType::Projected => "projected",
        }
        .to_string(),
        categories,
    }
}
