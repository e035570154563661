use chrono::NaiveDateTime;
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Format of the `date` field in the competitions document.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Club {
    pub name: String,
    pub email: String,
    #[serde(with = "string_number")]
    pub points: u32,
    #[serde(default)]
    pub bookings: Vec<BookingEntry>,
}

impl Club {
    pub fn new(name: impl Into<String>, email: impl Into<String>, points: u32) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            points,
            bookings: Vec::new(),
        }
    }
}

/// Running total of places one club holds in one competition.
///
/// Persisted as a single-key object, `{"Spring Festival": "4"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingEntry {
    pub competition: String,
    pub places: u32,
}

impl BookingEntry {
    pub fn new(competition: impl Into<String>, places: u32) -> Self {
        Self {
            competition: competition.into(),
            places,
        }
    }
}

impl Serialize for BookingEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.competition, &self.places.to_string())?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for BookingEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, NumberRepr>::deserialize(deserializer)?;
        if raw.len() != 1 {
            return Err(de::Error::custom(format!(
                "booking entry must hold exactly one competition, found {}",
                raw.len()
            )));
        }
        let (competition, places) = raw
            .into_iter()
            .next()
            .ok_or_else(|| de::Error::custom("empty booking entry"))?;
        Ok(Self {
            competition,
            places: places.into_u32().map_err(de::Error::custom)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competition {
    pub name: String,
    #[serde(with = "competition_date")]
    pub date: NaiveDateTime,
    #[serde(rename = "numberOfPlaces", with = "string_number")]
    pub number_of_places: u32,
}

impl Competition {
    pub fn new(name: impl Into<String>, date: NaiveDateTime, number_of_places: u32) -> Self {
        Self {
            name: name.into(),
            date,
            number_of_places,
        }
    }

    /// Parse a date written in [`DATE_FORMAT`].
    pub fn parse_date(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
        NaiveDateTime::parse_from_str(value, DATE_FORMAT)
    }

    /// Strictly earlier than `now`; a competition starting this very second
    /// is still bookable.
    pub fn is_past(&self, now: NaiveDateTime) -> bool {
        self.date < now
    }

    pub fn formatted_date(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClubsDocument {
    pub clubs: Vec<Club>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompetitionsDocument {
    pub competitions: Vec<Competition>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberRepr {
    Text(String),
    Int(u64),
}

impl NumberRepr {
    fn into_u32(self) -> Result<u32, String> {
        match self {
            Self::Text(text) => {
                if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(format!("'{}' is not a non-negative integer", text));
                }
                text.parse::<u32>()
                    .map_err(|e| format!("'{}' is out of range: {}", text, e))
            }
            Self::Int(value) => {
                u32::try_from(value).map_err(|_| format!("{} is out of range", value))
            }
        }
    }
}

/// Integers are written as decimal strings and read back from either a
/// string or a plain JSON integer.
mod string_number {
    use super::NumberRepr;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        NumberRepr::deserialize(deserializer)?
            .into_u32()
            .map_err(de::Error::custom)
    }
}

mod competition_date {
    use super::DATE_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &NaiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format(DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, DATE_FORMAT)
            .map_err(|e| de::Error::custom(format!("invalid date '{}': {}", raw, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_club_reads_string_and_integer_points() {
        let club: Club = serde_json::from_str(
            r#"{"name": "Simply Lift", "email": "john@simplylift.co", "points": "13"}"#,
        )
        .unwrap();
        assert_eq!(club.points, 13);
        assert!(club.bookings.is_empty());

        let club: Club = serde_json::from_str(
            r#"{"name": "Iron Temple", "email": "admin@irontemple.com", "points": 4,
                "bookings": [{"Spring Festival": 3}]}"#,
        )
        .unwrap();
        assert_eq!(club.points, 4);
        assert_eq!(club.bookings, vec![BookingEntry::new("Spring Festival", 3)]);
    }

    #[test]
    fn test_club_rejects_non_numeric_and_negative_points() {
        let result: std::result::Result<Club, _> = serde_json::from_str(
            r#"{"name": "She Lifts", "email": "kate@shelifts.co.uk", "points": "twelve"}"#,
        );
        assert!(result.is_err());

        let result: std::result::Result<Club, _> = serde_json::from_str(
            r#"{"name": "She Lifts", "email": "kate@shelifts.co.uk", "points": "-1"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_number_strings_must_be_plain_digits() {
        for points in [" 13 ", "+5", "", "1_000", "4294967296"] {
            let json = format!(
                r#"{{"name": "She Lifts", "email": "kate@shelifts.co.uk", "points": "{}"}}"#,
                points
            );
            let result: std::result::Result<Club, _> = serde_json::from_str(&json);
            assert!(result.is_err(), "accepted points {:?}", points);
        }

        let result: std::result::Result<Competition, _> = serde_json::from_str(
            r#"{"name": "Fall Classic", "date": "2020-10-22 13:30:00", "numberOfPlaces": "013"}"#,
        );
        assert_eq!(result.unwrap().number_of_places, 13);
    }

    #[test]
    fn test_numbers_are_written_as_strings() {
        let mut club = Club::new("Simply Lift", "john@simplylift.co", 16);
        club.bookings.push(BookingEntry::new("Spring Festival", 4));

        let value = serde_json::to_value(&club).unwrap();
        assert_eq!(value["points"], serde_json::json!("16"));
        assert_eq!(
            value["bookings"],
            serde_json::json!([{"Spring Festival": "4"}])
        );

        let competition = Competition::new(
            "Fall Classic",
            Competition::parse_date("2020-10-22 13:30:00").unwrap(),
            13,
        );
        let value = serde_json::to_value(&competition).unwrap();
        assert_eq!(value["numberOfPlaces"], serde_json::json!("13"));
        assert_eq!(value["date"], serde_json::json!("2020-10-22 13:30:00"));
    }

    #[test]
    fn test_booking_entry_requires_single_key() {
        let result: std::result::Result<BookingEntry, _> =
            serde_json::from_str(r#"{"A": "1", "B": "2"}"#);
        assert!(result.is_err());

        let result: std::result::Result<BookingEntry, _> = serde_json::from_str("{}");
        assert!(result.is_err());
    }

    #[test]
    fn test_competition_rejects_bad_date() {
        let result: std::result::Result<Competition, _> = serde_json::from_str(
            r#"{"name": "Spring Festival", "date": "22/10/2024", "numberOfPlaces": "25"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_is_past_is_strict() {
        let date = Competition::parse_date("2024-10-22 13:00:00").unwrap();
        let competition = Competition::new("Spring Festival", date, 25);

        assert!(!competition.is_past(date));
        assert!(competition.is_past(date + chrono::Duration::seconds(1)));
        assert!(!competition.is_past(date - chrono::Duration::days(1)));
    }
}
