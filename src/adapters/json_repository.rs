use crate::domain::model::{Club, ClubsDocument, Competition, CompetitionsDocument};
use crate::domain::ports::{Repository, Storage};
use crate::utils::error::{BookingError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Keeps clubs and competitions as two JSON documents in a [`Storage`].
#[derive(Debug, Clone)]
pub struct JsonRepository<S: Storage> {
    storage: S,
    clubs_file: String,
    competitions_file: String,
}

impl<S: Storage> JsonRepository<S> {
    pub fn new(storage: S, clubs_file: impl Into<String>, competitions_file: impl Into<String>) -> Self {
        Self {
            storage,
            clubs_file: clubs_file.into(),
            competitions_file: competitions_file.into(),
        }
    }

    async fn read_document<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let bytes = self.storage.read_file(path).await.map_err(|e| match e {
            BookingError::IoError(io) if io.kind() == std::io::ErrorKind::NotFound => {
                BookingError::ResourceNotFound {
                    resource: path.to_string(),
                }
            }
            other => other,
        })?;

        serde_json::from_slice(&bytes).map_err(|e| BookingError::MalformedData {
            resource: path.to_string(),
            message: e.to_string(),
        })
    }

    async fn write_document<T: Serialize>(&self, path: &str, document: &T) -> Result<()> {
        let buffer = {
            let mut buffer = Vec::new();
            let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
            let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
            document.serialize(&mut serializer)?;
            buffer
        };

        tracing::debug!("Writing {} ({} bytes)", path, buffer.len());
        self.storage.write_file(path, &buffer).await
    }
}

impl<S: Storage> Repository for JsonRepository<S> {
    async fn load_clubs(&self) -> Result<Vec<Club>> {
        let document: ClubsDocument = self.read_document(&self.clubs_file).await?;
        Ok(document.clubs)
    }

    async fn load_competitions(&self) -> Result<Vec<Competition>> {
        let document: CompetitionsDocument = self.read_document(&self.competitions_file).await?;
        Ok(document.competitions)
    }

    async fn persist_clubs(&self, clubs: &[Club]) -> Result<()> {
        let document = ClubsDocument {
            clubs: clubs.to_vec(),
        };
        self.write_document(&self.clubs_file, &document).await
    }

    async fn persist_competitions(&self, competitions: &[Competition]) -> Result<()> {
        let document = CompetitionsDocument {
            competitions: competitions.to_vec(),
        };
        self.write_document(&self.competitions_file, &document).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        async fn put(&self, path: &str, data: &str) {
            self.files
                .lock()
                .await
                .insert(path.to_string(), data.as_bytes().to_vec());
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            self.files.lock().await.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                BookingError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    fn repository(storage: &MockStorage) -> JsonRepository<MockStorage> {
        JsonRepository::new(storage.clone(), "clubs.json", "competitions.json")
    }

    #[tokio::test]
    async fn test_missing_document_is_resource_not_found() {
        let storage = MockStorage::default();
        let err = repository(&storage).load_clubs().await.unwrap_err();
        assert!(matches!(err, BookingError::ResourceNotFound { resource } if resource == "clubs.json"));
    }

    #[tokio::test]
    async fn test_unparsable_document_is_malformed() {
        let storage = MockStorage::default();
        storage.put("clubs.json", r#"{"clubs": [{"name": "x"}]}"#).await;
        storage.put("competitions.json", "not json").await;

        let repo = repository(&storage);
        assert!(matches!(
            repo.load_clubs().await.unwrap_err(),
            BookingError::MalformedData { .. }
        ));
        assert!(matches!(
            repo.load_competitions().await.unwrap_err(),
            BookingError::MalformedData { .. }
        ));
    }

    #[tokio::test]
    async fn test_load_documents() {
        let storage = MockStorage::default();
        storage
            .put(
                "clubs.json",
                r#"{"clubs": [
                    {"name": "Simply Lift", "email": "john@simplylift.co", "points": "13"},
                    {"name": "Iron Temple", "email": "admin@irontemple.com", "points": "4",
                     "bookings": [{"Fall Classic": "2"}]}
                ]}"#,
            )
            .await;
        storage
            .put(
                "competitions.json",
                r#"{"competitions": [
                    {"name": "Spring Festival", "date": "2020-03-27 10:00:00", "numberOfPlaces": "25"}
                ]}"#,
            )
            .await;

        let repo = repository(&storage);
        let clubs = repo.load_clubs().await.unwrap();
        let competitions = repo.load_competitions().await.unwrap();

        assert_eq!(clubs.len(), 2);
        assert_eq!(clubs[1].bookings[0].places, 2);
        assert_eq!(competitions[0].number_of_places, 25);
    }

    #[tokio::test]
    async fn test_persist_writes_stringly_typed_document() {
        let storage = MockStorage::default();
        let repo = repository(&storage);

        let mut club = Club::new("Simply Lift", "john@simplylift.co", 16);
        club.bookings
            .push(crate::domain::model::BookingEntry::new("Spring Festival", 4));
        repo.persist_clubs(&[club.clone()]).await.unwrap();

        let written = storage.get_file("clubs.json").await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&written).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"clubs": [{
                "name": "Simply Lift",
                "email": "john@simplylift.co",
                "points": "16",
                "bookings": [{"Spring Festival": "4"}]
            }]})
        );
        assert!(String::from_utf8(written).unwrap().contains("\n    \"clubs\""));

        assert_eq!(repo.load_clubs().await.unwrap(), vec![club]);
    }
}
