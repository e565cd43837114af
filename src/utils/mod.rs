// Utility modules

pub mod labels;
