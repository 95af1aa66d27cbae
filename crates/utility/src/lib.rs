pub mod date;
pub mod generation;
pub mod id;
pub mod lap_time;
