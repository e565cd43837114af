// Module exports for models

pub mod blocked_slot;
pub mod booking;
pub mod business_hours;
pub mod clock;
pub mod court;
pub mod occupancy;
pub mod selection;
pub mod settings;
pub mod time_slot;
