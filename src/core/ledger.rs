use crate::domain::model::{BookingEntry, Club};

/// First ledger row recorded for `competition`.
pub fn find_entry<'a>(club: &'a Club, competition: &str) -> Option<&'a BookingEntry> {
    club.bookings
        .iter()
        .find(|entry| entry.competition == competition)
}

/// Adds `places` to the club's running total for `competition`, appending
/// a new row the first time. Returns the new total.
pub fn accumulate(club: &mut Club, competition: &str, places: u32) -> u32 {
    match club
        .bookings
        .iter_mut()
        .find(|entry| entry.competition == competition)
    {
        Some(entry) => {
            entry.places = entry.places.saturating_add(places);
            entry.places
        }
        None => {
            club.bookings.push(BookingEntry::new(competition, places));
            places
        }
    }
}
