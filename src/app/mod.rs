pub mod messages;
pub mod run;
pub mod schedule;
