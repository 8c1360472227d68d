pub mod lifting;
pub mod results;
pub mod state;
