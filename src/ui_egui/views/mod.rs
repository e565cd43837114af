pub mod booking_grid;
mod palette;

pub(crate) use palette::GridPalette;
