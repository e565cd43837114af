// Occupancy module
// Common view over anything that takes up time on a court

use super::clock::TimeRange;
use super::court::CourtId;

/// A record occupying an interval on one court.
///
/// Implemented by confirmed bookings and administrator blocks so the
/// classifier and overlap resolver can treat both uniformly.
pub trait Occupancy {
    fn court_id(&self) -> &CourtId;

    fn range(&self) -> TimeRange;

    fn set_range(&mut self, range: TimeRange);

    /// A detached copy covering `range`, used when one record is split in two.
    fn fragment(&self, range: TimeRange) -> Self
    where
        Self: Sized + Clone,
    {
        let mut copy = self.clone();
        copy.set_range(range);
        copy
    }
}
