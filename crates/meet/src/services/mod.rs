//! Views derived from a snapshot. None of these are stored; they are
//! recomputed from the current state whenever they are needed.

pub mod placement;
pub mod plates;
pub mod progression;
pub mod totals;

pub use placement::{
    Category, CategoryResults, ResultsType, WeightClass, get_all_results, get_final_results,
    get_projected_results,
};
pub use plates::{BarLoad, LoadedPlate, bar_load_for, make_relative, select_plates};
pub use progression::{LiftingOrder, entries_in_flight, get_lifting_order, lifting_order_for};
