//! # Offer Numbering
//!
//! Offer numbers are `YYYY-NNNN`: the year plus a per-year counter padded
//! to four digits (`2024-0007`).
//!
//! ```text
//! stored counter for year? ──yes──► counter + 1
//!          │no
//!          ▼
//! highest NNNN among existing "YYYY-" numbers + 1, or 1 if none
//! ```

use std::fmt;

/// A parsed `YYYY-NNNN` offer number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct OfferNumber {
    pub year: i32,
    pub sequence: u32,
}

impl OfferNumber {
    pub fn new(year: i32, sequence: u32) -> Self {
        OfferNumber { year, sequence }
    }

    /// Parses `YYYY-NNNN`. Only the leading digits of the sequence count,
    /// so suffixed numbers such as `2024-0003-rev` read as sequence 3.
    /// Returns `None` when the year or the sequence has no digits.
    pub fn parse(value: &str) -> Option<Self> {
        let mut parts = value.trim().split('-');
        let year = parts.next()?.parse().ok()?;
        let sequence = parts.next()?;
        let digits = sequence
            .find(|c: char| !c.is_ascii_digit())
            .map_or(sequence, |end| &sequence[..end]);

        Some(OfferNumber {
            year,
            sequence: digits.parse().ok()?,
        })
    }
}

impl fmt::Display for OfferNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:04}", self.year, self.sequence)
    }
}

/// Picks the next offer number for `year`.
///
/// `stored_counter` is the last number handed out this year, if the caller
/// keeps one. Without it, existing offer numbers are scanned.
///
/// ## Example
/// ```rust
/// use offerdesk_core::numbering::next_offer_number;
///
/// assert_eq!(next_offer_number(2024, Some(6), std::iter::empty::<&str>()).to_string(), "2024-0007");
/// assert_eq!(next_offer_number(2024, None, ["2024-0003", "2023-0099"]).to_string(), "2024-0004");
/// assert_eq!(next_offer_number(2025, None, ["2024-0003"]).to_string(), "2025-0001");
/// ```
pub fn next_offer_number<'a, I>(year: i32, stored_counter: Option<u32>, existing: I) -> OfferNumber
where
    I: IntoIterator<Item = &'a str>,
{
    let sequence = match stored_counter {
        Some(counter) => counter.saturating_add(1),
        None => existing
            .into_iter()
            .filter_map(OfferNumber::parse)
            .filter(|n| n.year == year)
            .map(|n| n.sequence)
            .max()
            .map_or(1, |max| max.saturating_add(1)),
    };
    OfferNumber::new(year, sequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_sequence() {
        assert_eq!(OfferNumber::new(2024, 7).to_string(), "2024-0007");
        assert_eq!(OfferNumber::new(2024, 12345).to_string(), "2024-12345");
    }

    #[test]
    fn test_parse() {
        assert_eq!(OfferNumber::parse("2024-0042"), Some(OfferNumber::new(2024, 42)));
        assert_eq!(OfferNumber::parse("draft"), None);
        assert_eq!(OfferNumber::parse("2024-x"), None);
        assert_eq!(OfferNumber::parse("2024-"), None);
    }

    #[test]
    fn test_parse_reads_leading_sequence_digits() {
        assert_eq!(OfferNumber::parse("2024-0003-rev"), Some(OfferNumber::new(2024, 3)));
        assert_eq!(OfferNumber::parse("2024-0012b"), Some(OfferNumber::new(2024, 12)));

        let existing = ["2024-0003-rev", "2024-0002"];
        assert_eq!(next_offer_number(2024, None, existing), OfferNumber::new(2024, 4));
    }

    #[test]
    fn test_stored_counter_wins() {
        let next = next_offer_number(2024, Some(10), ["2024-0050"]);
        assert_eq!(next, OfferNumber::new(2024, 11));
    }

    #[test]
    fn test_scan_ignores_other_years_and_garbage() {
        let existing = ["2023-0900", "2024-0002", "bogus", "2024-0010"];
        assert_eq!(next_offer_number(2024, None, existing), OfferNumber::new(2024, 11));
        assert_eq!(next_offer_number(2026, None, existing), OfferNumber::new(2026, 1));
    }
}
