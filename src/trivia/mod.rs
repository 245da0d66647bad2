pub mod challenge;
pub mod edit_distance;
