pub mod fit;
pub mod sink;
