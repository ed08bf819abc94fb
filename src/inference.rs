pub mod dispatcher;
pub mod ranking;
