use crate::core::ledger;
use crate::domain::model::{Club, Competition};
use serde::Serialize;
use std::fmt;

/// Upper bound on places per request and on a club's total per competition.
pub const MAX_PLACES: u32 = 12;

/// Why a booking request was turned down, with the numbers needed to tell
/// the club about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rejection {
    PlacesOutOfRange { requested: i64 },
    NotEnoughPlaces { requested: u32, available: u32 },
    NotEnoughPoints { requested: u32, available: u32 },
    AthleteCapReached { requested: u32, already_booked: u32 },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlacesOutOfRange { .. } => {
                write!(f, "Place must be between 0 and {}", MAX_PLACES)
            }
            Self::NotEnoughPlaces { available, .. } => {
                write!(f, "There is only {} places available", available)
            }
            Self::NotEnoughPoints { available, .. } => {
                write!(f, "You have only {} points available", available)
            }
            Self::AthleteCapReached { already_booked, .. } => write!(
                f,
                "You have already registered {} athletes for this competition, the limit is {}",
                already_booked, MAX_PLACES
            ),
        }
    }
}

/// `0 <= requested <= 12`. Returns the request as a place count.
pub fn check_range(requested: i64) -> Result<u32, Rejection> {
    u32::try_from(requested)
        .ok()
        .filter(|places| *places <= MAX_PLACES)
        .ok_or(Rejection::PlacesOutOfRange { requested })
}

pub fn check_capacity(competition: &Competition, requested: u32) -> Result<(), Rejection> {
    if competition.number_of_places >= requested {
        Ok(())
    } else {
        Err(Rejection::NotEnoughPlaces {
            requested,
            available: competition.number_of_places,
        })
    }
}

pub fn check_points(club: &Club, requested: u32) -> Result<(), Rejection> {
    if club.points >= requested {
        Ok(())
    } else {
        Err(Rejection::NotEnoughPoints {
            requested,
            available: club.points,
        })
    }
}

/// Passes whenever the club has no ledger row for the competition yet.
pub fn check_athlete_cap(
    club: &Club,
    competition_name: &str,
    requested: u32,
) -> Result<(), Rejection> {
    match ledger::find_entry(club, competition_name) {
        Some(entry) if entry.places.saturating_add(requested) > MAX_PLACES => {
            Err(Rejection::AthleteCapReached {
                requested,
                already_booked: entry.places,
            })
        }
        _ => Ok(()),
    }
}

/// Runs range, capacity, points and athlete cap in that order, stopping at
/// the first failure.
pub fn validate(club: &Club, competition: &Competition, requested: i64) -> Result<u32, Rejection> {
    let places = check_range(requested)?;
    check_capacity(competition, places)?;
    check_points(club, places)?;
    check_athlete_cap(club, &competition.name, places)?;
    Ok(places)
}
