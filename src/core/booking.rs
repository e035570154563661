use crate::core::store::Store;
use crate::core::{ledger, validator};
use crate::domain::model::{Club, Competition};
use crate::domain::ports::{Clock, Repository, SystemClock};
use crate::utils::error::{BookingError, Result};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

/// Outcome of an accepted booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingReceipt {
    pub club: String,
    pub competition: String,
    pub places: u32,
    pub remaining_points: u32,
    pub remaining_places: u32,
    pub total_booked: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompetitionView {
    pub name: String,
    pub date: String,
    pub number_of_places: u32,
    pub is_past: bool,
}

impl CompetitionView {
    fn new(competition: &Competition, now: chrono::NaiveDateTime) -> Self {
        Self {
            name: competition.name.clone(),
            date: competition.formatted_date(),
            number_of_places: competition.number_of_places,
            is_past: competition.is_past(now),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookedPlaces {
    pub competition: String,
    pub places: u32,
}

/// Display copy of a club, detached from the live record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClubView {
    pub name: String,
    pub email: String,
    pub points: u32,
    pub bookings: Vec<BookedPlaces>,
}

impl From<&Club> for ClubView {
    fn from(club: &Club) -> Self {
        Self {
            name: club.name.clone(),
            email: club.email.clone(),
            points: club.points,
            bookings: club
                .bookings
                .iter()
                .map(|entry| BookedPlaces {
                    competition: entry.competition.clone(),
                    places: entry.places,
                })
                .collect(),
        }
    }
}

/// What a club sees after signing in.
#[derive(Debug, Clone, Serialize)]
pub struct ClubSummary {
    pub club: ClubView,
    pub competitions: Vec<CompetitionView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingView {
    pub club: ClubView,
    pub competition: CompetitionView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClubPoints {
    pub name: String,
    pub points: u32,
}

/// Owns the store and serializes every booking through one lock, held for
/// the whole validate, mutate and persist sequence.
///
/// A failed write halts the service: memory is then ahead of disk and every
/// later booking is refused until the process is restarted.
pub struct BookingService<R: Repository, C: Clock = SystemClock> {
    store: Mutex<Store>,
    repository: R,
    clock: C,
    halted: AtomicBool,
}

impl<R: Repository, C: Clock> BookingService<R, C> {
    pub fn new(store: Store, repository: R, clock: C) -> Self {
        Self {
            store: Mutex::new(store),
            repository,
            clock,
            halted: AtomicBool::new(false),
        }
    }

    /// False once a write after a booking has failed.
    pub fn is_healthy(&self) -> bool {
        !self.halted.load(Ordering::SeqCst)
    }

    pub async fn load(repository: R, clock: C) -> Result<Self> {
        let store = Store::load(&repository).await?;
        Ok(Self::new(store, repository, clock))
    }

    /// Copy of the current state.
    pub async fn snapshot(&self) -> Store {
        self.store.lock().await.clone()
    }

    pub async fn show_summary(&self, email: &str) -> Result<ClubSummary> {
        let store = self.store.lock().await;
        let club = store
            .find_club_by_email(email)
            .ok_or_else(|| BookingError::EmailNotRegistered {
                email: email.to_string(),
            })?;
        let now = self.clock.now();

        Ok(ClubSummary {
            club: ClubView::from(club),
            competitions: store
                .competitions()
                .iter()
                .map(|c| CompetitionView::new(c, now))
                .collect(),
        })
    }

    /// The booking form for one competition; closed once the competition
    /// has taken place.
    pub async fn booking_view(&self, competition_name: &str, club_name: &str) -> Result<BookingView> {
        let store = self.store.lock().await;
        let club = store
            .find_club_by_name(club_name)
            .ok_or_else(|| BookingError::ClubNotFound {
                name: club_name.to_string(),
            })?;
        let competition = store
            .find_competition_by_name(competition_name)
            .ok_or_else(|| BookingError::CompetitionNotFound {
                name: competition_name.to_string(),
            })?;

        let now = self.clock.now();
        if competition.is_past(now) {
            return Err(BookingError::PastCompetition {
                name: competition.name.clone(),
                date: competition.formatted_date(),
            });
        }

        Ok(BookingView {
            club: ClubView::from(club),
            competition: CompetitionView::new(competition, now),
        })
    }

    pub async fn points_board(&self) -> Vec<ClubPoints> {
        let store = self.store.lock().await;
        store
            .clubs()
            .iter()
            .map(|club| ClubPoints {
                name: club.name.clone(),
                points: club.points,
            })
            .collect()
    }

    /// Validates `requested` places for the named club and competition and,
    /// when every check passes, debits capacity, points and the club's
    /// ledger before writing both documents back.
    ///
    /// A persistence failure leaves memory ahead of disk; it is reported as
    /// `BookingError::Persistence`, not rolled back, and halts the service.
    pub async fn attempt_booking(
        &self,
        club_name: &str,
        competition_name: &str,
        requested: i64,
    ) -> Result<BookingReceipt> {
        let mut store = self.store.lock().await;

        if !self.is_healthy() {
            return Err(BookingError::ServiceHalted);
        }

        let club_idx = store
            .club_position(club_name)
            .ok_or_else(|| BookingError::ClubNotFound {
                name: club_name.to_string(),
            })?;
        let competition_idx = store
            .competition_position(competition_name)
            .ok_or_else(|| BookingError::CompetitionNotFound {
                name: competition_name.to_string(),
            })?;

        let (club, competition) = store.entities_mut(club_idx, competition_idx);

        if competition.is_past(self.clock.now()) {
            tracing::info!(
                club = %club.name,
                competition = %competition.name,
                "Booking refused, competition is over"
            );
            return Err(BookingError::PastCompetition {
                name: competition.name.clone(),
                date: competition.formatted_date(),
            });
        }

        let places = validator::validate(club, competition, requested).map_err(|rejection| {
            tracing::info!(
                club = %club.name,
                competition = %competition.name,
                requested,
                reason = %rejection,
                "Booking rejected"
            );
            BookingError::Rejected(rejection)
        })?;

        competition.number_of_places -= places;
        club.points -= places;
        let total_booked = ledger::accumulate(club, &competition.name, places);

        let receipt = BookingReceipt {
            club: club.name.clone(),
            competition: competition.name.clone(),
            places,
            remaining_points: club.points,
            remaining_places: competition.number_of_places,
            total_booked,
        };

        store
            .persist_competitions(&self.repository)
            .await
            .map_err(|e| self.persistence_failure("competitions", e))?;
        store
            .persist_clubs(&self.repository)
            .await
            .map_err(|e| self.persistence_failure("clubs", e))?;

        tracing::info!(
            club = %receipt.club,
            competition = %receipt.competition,
            places = receipt.places,
            remaining_points = receipt.remaining_points,
            remaining_places = receipt.remaining_places,
            "Great-booking complete!"
        );
        Ok(receipt)
    }

    fn persistence_failure(&self, resource: &str, source: BookingError) -> BookingError {
        self.halted.store(true, Ordering::SeqCst);
        tracing::error!(
            resource,
            error = %source,
            "Persisting after a booking failed, memory and disk have diverged; bookings halted"
        );
        BookingError::Persistence {
            resource: resource.to_string(),
            source: Box::new(source),
        }
    }
}
