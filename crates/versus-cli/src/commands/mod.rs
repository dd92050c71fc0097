pub mod compare;
pub mod report;
