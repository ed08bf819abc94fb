pub mod label;
pub mod state;
