pub mod deduction;
pub mod schedule;
