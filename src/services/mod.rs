// Service module exports

pub mod booking;
pub mod business_hours;
pub mod classifier;
pub mod overlap;
pub mod selector;
pub mod settings;
