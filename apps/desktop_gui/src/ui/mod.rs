//! egui front end.

pub mod app;
