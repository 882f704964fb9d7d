use std::fmt;

use sea_orm::FromQueryResult;

/// Every search returns at most this many rows.
pub const PAGE_SIZE: u64 = 10;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SearchKind {
    Keyword,
    GenreYear,
    Actor,
    Rating,
}

impl SearchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchKind::Keyword => "keyword",
            SearchKind::GenreYear => "genre_year",
            SearchKind::Actor => "actor",
            SearchKind::Rating => "rating",
        }
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Rating {
    G,
    Pg,
    Pg13,
    R,
    Nc17,
}

impl Rating {
    pub const ALL: [Rating; 5] = [Rating::G, Rating::Pg, Rating::Pg13, Rating::R, Rating::Nc17];

    pub fn as_str(self) -> &'static str {
        match self {
            Rating::G => "G",
            Rating::Pg => "PG",
            Rating::Pg13 => "PG-13",
            Rating::R => "R",
            Rating::Nc17 => "NC-17",
        }
    }

    /// Accepts user input in any case with surrounding whitespace.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = normalize_rating(raw);
        Self::ALL.into_iter().find(|r| r.as_str() == normalized)
    }

    /// Ratings to offer in the prompt: what the catalog holds, or the fixed scale when
    /// the catalog could not be enumerated.
    pub fn options(available: Vec<String>) -> Vec<String> {
        if available.is_empty() {
            Self::ALL.iter().map(|r| r.as_str().to_string()).collect()
        } else {
            available
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn normalize_rating(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Term logged for a genre+year search.
pub fn genre_year_term(genre: &str, year: i32) -> String {
    format!("{genre}, {year}")
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum RecordPolicy {
    /// Log every executed search.
    #[default]
    Always,
    /// Log only searches that returned at least one film.
    NonEmptyOnly,
}

impl RecordPolicy {
    pub fn should_record(self, hits: usize) -> bool {
        match self {
            RecordPolicy::Always => true,
            RecordPolicy::NonEmptyOnly => hits > 0,
        }
    }
}

/// A film row as handed to the presentation layer. `genre` is filled by the genre+year
/// search and `rating` by the rating search; the other searches leave both empty.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FilmSummary {
    pub film_id: u16,
    pub title: String,
    pub description: Option<String>,
    pub release_year: Option<u16>,
    pub genre: Option<String>,
    pub rating: Option<String>,
}

#[derive(Clone, Debug, Eq, PartialEq, FromQueryResult)]
pub struct PopularSearch {
    pub search_term: String,
    pub frequency: i64,
}

#[derive(Debug, FromQueryResult)]
pub struct FilmRow {
    pub film_id: u16,
    pub title: String,
    pub description: Option<String>,
    pub release_year: Option<u16>,
}

#[derive(Debug, FromQueryResult)]
pub struct GenreFilmRow {
    pub film_id: u16,
    pub title: String,
    pub description: Option<String>,
    pub release_year: Option<u16>,
    pub genre: String,
}

#[derive(Debug, FromQueryResult)]
pub struct RatedFilmRow {
    pub film_id: u16,
    pub title: String,
    pub description: Option<String>,
    pub release_year: Option<u16>,
    pub rating: Option<String>,
}

impl From<FilmRow> for FilmSummary {
    fn from(row: FilmRow) -> Self {
        Self {
            film_id: row.film_id,
            title: row.title,
            description: row.description,
            release_year: row.release_year,
            genre: None,
            rating: None,
        }
    }
}

impl From<GenreFilmRow> for FilmSummary {
    fn from(row: GenreFilmRow) -> Self {
        Self {
            film_id: row.film_id,
            title: row.title,
            description: row.description,
            release_year: row.release_year,
            genre: Some(row.genre),
            rating: None,
        }
    }
}

impl From<RatedFilmRow> for FilmSummary {
    fn from(row: RatedFilmRow) -> Self {
        Self {
            film_id: row.film_id,
            title: row.title,
            description: row.description,
            release_year: row.release_year,
            genre: None,
            rating: row.rating,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_kind_column_values() {
        assert_eq!(SearchKind::Keyword.to_string(), "keyword");
        assert_eq!(SearchKind::GenreYear.as_str(), "genre_year");
        assert_eq!(SearchKind::Actor.as_str(), "actor");
        assert_eq!(SearchKind::Rating.as_str(), "rating");
    }

    #[test]
    fn rating_parse_normalizes_input() {
        assert_eq!(Rating::parse("  pg-13 "), Some(Rating::Pg13));
        assert_eq!(Rating::parse("nc-17"), Some(Rating::Nc17));
        assert_eq!(Rating::parse("PG13"), None);
        assert_eq!(normalize_rating(" r\n"), "R");
    }

    #[test]
    fn rating_options_fall_back_to_fixed_scale() {
        assert_eq!(Rating::options(Vec::new()), vec!["G", "PG", "PG-13", "R", "NC-17"]);
        assert_eq!(Rating::options(vec!["PG".to_string()]), vec!["PG"]);
    }

    #[test]
    fn genre_year_term_matches_log_format() {
        assert_eq!(genre_year_term("Action", 2006), "Action, 2006");
    }

    #[test]
    fn record_policy_decides_on_hits() {
        assert!(RecordPolicy::Always.should_record(0));
        assert!(RecordPolicy::Always.should_record(3));
        assert!(!RecordPolicy::NonEmptyOnly.should_record(0));
        assert!(RecordPolicy::NonEmptyOnly.should_record(1));
    }
}
