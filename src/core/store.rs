use crate::domain::model::{Club, Competition};
use crate::domain::ports::Repository;
use crate::utils::error::Result;

/// The single authoritative in-memory copy of clubs and competitions.
#[derive(Debug, Clone, Default)]
pub struct Store {
    clubs: Vec<Club>,
    competitions: Vec<Competition>,
}

impl Store {
    pub fn new(clubs: Vec<Club>, competitions: Vec<Competition>) -> Self {
        Self {
            clubs,
            competitions,
        }
    }

    /// Loads both collections; either failure aborts the whole load.
    pub async fn load<R: Repository>(repository: &R) -> Result<Self> {
        let competitions = repository.load_competitions().await?;
        let clubs = repository.load_clubs().await?;
        tracing::info!(
            clubs = clubs.len(),
            competitions = competitions.len(),
            "Loaded booking data"
        );
        Ok(Self::new(clubs, competitions))
    }

    pub fn clubs(&self) -> &[Club] {
        &self.clubs
    }

    pub fn competitions(&self) -> &[Competition] {
        &self.competitions
    }

    pub fn find_competition_by_name(&self, name: &str) -> Option<&Competition> {
        self.competitions.iter().find(|c| c.name == name)
    }

    pub fn find_club_by_name(&self, name: &str) -> Option<&Club> {
        self.clubs.iter().find(|c| c.name == name)
    }

    pub fn find_club_by_email(&self, email: &str) -> Option<&Club> {
        self.clubs.iter().find(|c| c.email == email)
    }

    /// Index of the first club named `name`, for in-place mutation.
    pub(crate) fn club_position(&self, name: &str) -> Option<usize> {
        self.clubs.iter().position(|c| c.name == name)
    }

    pub(crate) fn competition_position(&self, name: &str) -> Option<usize> {
        self.competitions.iter().position(|c| c.name == name)
    }

    /// Mutable access to one club and one competition at the same time.
    pub(crate) fn entities_mut(
        &mut self,
        club: usize,
        competition: usize,
    ) -> (&mut Club, &mut Competition) {
        (&mut self.clubs[club], &mut self.competitions[competition])
    }

    pub async fn persist_clubs<R: Repository>(&self, repository: &R) -> Result<()> {
        repository.persist_clubs(&self.clubs).await
    }

    pub async fn persist_competitions<R: Repository>(&self, repository: &R) -> Result<()> {
        repository.persist_competitions(&self.competitions).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Store {
        let date = Competition::parse_date("2030-03-27 10:00:00").unwrap();
        Store::new(
            vec![
                Club::new("Simply Lift", "john@simplylift.co", 13),
                Club::new("Iron Temple", "admin@irontemple.com", 4),
                Club::new("Iron Temple", "second@irontemple.com", 9),
            ],
            vec![
                Competition::new("Spring Festival", date, 25),
                Competition::new("Fall Classic", date, 13),
            ],
        )
    }

    #[test]
    fn test_lookups_return_first_match() {
        let store = sample();

        assert_eq!(
            store.find_club_by_name("Iron Temple").unwrap().email,
            "admin@irontemple.com"
        );
        assert_eq!(
            store.find_club_by_email("john@simplylift.co").unwrap().name,
            "Simply Lift"
        );
        assert_eq!(
            store
                .find_competition_by_name("Fall Classic")
                .unwrap()
                .number_of_places,
            13
        );
    }

    #[test]
    fn test_unknown_lookups_are_absent() {
        let store = sample();

        assert!(store.find_club_by_name("She Lifts").is_none());
        assert!(store.find_club_by_email("john@ift.co").is_none());
        assert!(store.find_competition_by_name("Winter Open").is_none());
        assert!(store.club_position("She Lifts").is_none());
    }
}
