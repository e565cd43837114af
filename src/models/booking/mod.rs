// Booking module
// Confirmed reservations on a court for a given date

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::clock::{ClockTime, TimeRange};
use super::court::CourtId;
use super::occupancy::Occupancy;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(String);

impl BookingId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingKind {
    /// Regular court rental
    #[default]
    Shift,
    /// Coached class, usually superseding rentals it overlaps
    Class,
}

impl BookingKind {
    pub fn label(&self) -> &'static str {
        match self {
            BookingKind::Shift => "Shift",
            BookingKind::Class => "Class",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Partial,
    Paid,
}

impl PaymentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Partial => "Partial",
            PaymentStatus::Paid => "Paid",
        }
    }
}

/// A confirmed booking as held in the grid's read-through cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(default)]
    pub id: Option<BookingId>,
    pub court_id: CourtId,
    #[serde(rename = "startTime")]
    pub start: ClockTime,
    #[serde(rename = "endTime")]
    pub end: ClockTime,
    pub date: NaiveDate,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(rename = "type", default)]
    pub kind: BookingKind,
}

impl Booking {
    /// Create a booking with the required fields.
    ///
    /// # Examples
    /// ```
    /// use court_grid::models::booking::Booking;
    /// use court_grid::models::court::CourtId;
    /// use court_grid::models::occupancy::Occupancy;
    /// use chrono::NaiveDate;
    ///
    /// let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
    /// let booking = Booking::new(
    ///     CourtId::new("c1"),
    ///     date,
    ///     "09:00".parse().unwrap(),
    ///     "10:30".parse().unwrap(),
    /// )
    /// .unwrap();
    /// assert_eq!(booking.range().duration_minutes(), 90);
    /// ```
    pub fn new(
        court_id: CourtId,
        date: NaiveDate,
        start: ClockTime,
        end: ClockTime,
    ) -> Result<Self, String> {
        let booking = Self {
            id: None,
            court_id,
            start,
            end,
            date,
            title: None,
            description: None,
            price: None,
            payment_status: PaymentStatus::Pending,
            participants: Vec::new(),
            kind: BookingKind::Shift,
        };
        booking.validate()?;
        Ok(booking)
    }

    pub fn builder() -> BookingBuilder {
        BookingBuilder::new()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.end <= self.start {
            return Err("Booking end time must be after start time".to_string());
        }

        if !self.start.is_on_grid() || !self.end.is_on_grid() {
            return Err("Booking times must align to the 15-minute grid".to_string());
        }

        if let Some(price) = self.price {
            if !price.is_finite() || price < 0.0 {
                return Err("Booking price must be a non-negative amount".to_string());
            }
        }

        Ok(())
    }

    /// Title to render on the grid; falls back to the booking kind.
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|title| !title.trim().is_empty())
            .unwrap_or(self.kind.label())
    }
}

impl Occupancy for Booking {
    fn court_id(&self) -> &CourtId {
        &self.court_id
    }

    fn range(&self) -> TimeRange {
        TimeRange::new(self.start, self.end)
    }

    fn set_range(&mut self, range: TimeRange) {
        self.start = range.start;
        self.end = range.end;
    }

    fn fragment(&self, range: TimeRange) -> Self {
        let mut copy = self.clone();
        copy.id = None;
        copy.set_range(range);
        copy
    }
}

/// Builder for bookings with optional fields
pub struct BookingBuilder {
    court_id: Option<CourtId>,
    date: Option<NaiveDate>,
    start: Option<ClockTime>,
    end: Option<ClockTime>,
    title: Option<String>,
    description: Option<String>,
    price: Option<f64>,
    payment_status: PaymentStatus,
    participants: Vec<String>,
    kind: BookingKind,
}

impl BookingBuilder {
    pub fn new() -> Self {
        Self {
            court_id: None,
            date: None,
            start: None,
            end: None,
            title: None,
            description: None,
            price: None,
            payment_status: PaymentStatus::Pending,
            participants: Vec::new(),
            kind: BookingKind::Shift,
        }
    }

    pub fn court(mut self, court_id: CourtId) -> Self {
        self.court_id = Some(court_id);
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn start(mut self, start: ClockTime) -> Self {
        self.start = Some(start);
        self
    }

    pub fn end(mut self, end: ClockTime) -> Self {
        self.end = Some(end);
        self
    }

    /// Set both ends from a range
    pub fn range(self, range: TimeRange) -> Self {
        self.start(range.start).end(range.end)
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn payment_status(mut self, status: PaymentStatus) -> Self {
        self.payment_status = status;
        self
    }

    pub fn participant(mut self, name: impl Into<String>) -> Self {
        self.participants.push(name.into());
        self
    }

    pub fn kind(mut self, kind: BookingKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn build(self) -> Result<Booking, String> {
        let court_id = self.court_id.ok_or("Booking court is required")?;
        let date = self.date.ok_or("Booking date is required")?;
        let start = self.start.ok_or("Booking start time is required")?;
        let end = self.end.ok_or("Booking end time is required")?;

        let booking = Booking {
            id: None,
            court_id,
            start,
            end,
            date,
            title: self.title,
            description: self.description,
            price: self.price,
            payment_status: self.payment_status,
            participants: self.participants,
            kind: self.kind,
        };

        booking.validate()?;
        Ok(booking)
    }
}

impl Default for BookingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::clock::t;

    fn sample_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    #[test]
    fn test_new_booking_success() {
        let booking = Booking::new(CourtId::new("c1"), sample_date(), t("09:00"), t("10:00")).unwrap();
        assert!(booking.id.is_none());
        assert_eq!(booking.kind, BookingKind::Shift);
        assert_eq!(booking.payment_status, PaymentStatus::Pending);
        assert_eq!(booking.range(), TimeRange::new(t("09:00"), t("10:00")));
    }

    #[test]
    fn test_new_booking_invalid_times() {
        let result = Booking::new(CourtId::new("c1"), sample_date(), t("10:00"), t("10:00"));
        assert_eq!(
            result.unwrap_err(),
            "Booking end time must be after start time"
        );
    }

    #[test]
    fn test_new_booking_off_grid() {
        let result = Booking::new(CourtId::new("c1"), sample_date(), t("09:10"), t("10:00"));
        assert!(result.unwrap_err().contains("15-minute grid"));
    }

    #[test]
    fn test_builder_with_optional_fields() {
        let booking = Booking::builder()
            .court(CourtId::new("c2"))
            .date(sample_date())
            .start(t("18:00"))
            .end(t("19:30"))
            .title("Beginners clinic")
            .description("Bring your own racket")
            .price(40.0)
            .payment_status(PaymentStatus::Partial)
            .participant("Ana")
            .participant("Luis")
            .kind(BookingKind::Class)
            .build()
            .unwrap();

        assert_eq!(booking.display_title(), "Beginners clinic");
        assert_eq!(booking.participants, vec!["Ana", "Luis"]);
        assert_eq!(booking.kind, BookingKind::Class);
        assert_eq!(booking.price, Some(40.0));
    }

    #[test]
    fn test_builder_missing_court() {
        let result = Booking::builder()
            .date(sample_date())
            .start(t("09:00"))
            .end(t("10:00"))
            .build();
        assert_eq!(result.unwrap_err(), "Booking court is required");
    }

    #[test]
    fn test_builder_negative_price() {
        let result = Booking::builder()
            .court(CourtId::new("c1"))
            .date(sample_date())
            .start(t("09:00"))
            .end(t("10:00"))
            .price(-5.0)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_display_title_falls_back_to_kind() {
        let mut booking = Booking::new(CourtId::new("c1"), sample_date(), t("09:00"), t("10:00")).unwrap();
        assert_eq!(booking.display_title(), "Shift");
        booking.title = Some("   ".to_string());
        assert_eq!(booking.display_title(), "Shift");
    }

    #[test]
    fn test_fragment_drops_id() {
        let mut booking = Booking::new(CourtId::new("c1"), sample_date(), t("09:00"), t("12:00")).unwrap();
        booking.id = Some(BookingId::new("bk-1"));
        let tail = booking.fragment(TimeRange::new(t("11:00"), t("12:00")));
        assert!(tail.id.is_none());
        assert_eq!(tail.start, t("11:00"));
        assert_eq!(booking.id, Some(BookingId::new("bk-1")));
    }

    #[test]
    fn test_deserializes_service_shape() {
        let json = r#"{
            "id": "bk-7",
            "courtId": "c1",
            "startTime": "14:00",
            "endTime": "15:30",
            "date": "2025-03-14",
            "paymentStatus": "paid",
            "type": "class"
        }"#;
        let booking: Booking = serde_json::from_str(json).unwrap();
        assert_eq!(booking.id, Some(BookingId::new("bk-7")));
        assert_eq!(booking.start, t("14:00"));
        assert_eq!(booking.payment_status, PaymentStatus::Paid);
        assert_eq!(booking.kind, BookingKind::Class);
        assert!(booking.participants.is_empty());
    }
}
