pub mod app;
pub mod calendar;
pub mod day;
mod help;
mod jumpto;
pub mod theme;
pub mod widget;
