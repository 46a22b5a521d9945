pub mod backup;
pub mod calendar;
pub mod core;
pub mod holidays;
pub mod schedule;
pub mod setup;
pub mod timetable;
