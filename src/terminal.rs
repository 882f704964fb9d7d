use std::fmt::Write;

use crate::models::{FilmSummary, PopularSearch};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MenuChoice {
    Keyword,
    GenreYear,
    Actor,
    Rating,
    Popular,
    Exit,
}

impl MenuChoice {
    const ENTRIES: [(MenuChoice, &'static str); 6] = [
        (MenuChoice::Keyword, "Search films by keyword"),
        (MenuChoice::GenreYear, "Search films by genre and year"),
        (MenuChoice::Actor, "Search films by actor"),
        (MenuChoice::Rating, "Search films by rating"),
        (MenuChoice::Popular, "Show popular searches"),
        (MenuChoice::Exit, "Exit"),
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        let index: usize = raw.trim().parse().ok()?;
        Self::ENTRIES.get(index.checked_sub(1)?).map(|(choice, _)| *choice)
    }
}

pub fn menu() -> String {
    let mut out = String::from("\nChoose an action:\n");
    for (i, (_, label)) in MenuChoice::ENTRIES.iter().enumerate() {
        let _ = writeln!(out, "{}. {label}", i + 1);
    }
    out
}

/// Comma separated list for prompts; empty when the catalog could not be enumerated.
pub fn options_line(label: &str, options: &[String]) -> String {
    if options.is_empty() {
        return String::new();
    }
    format!("Available {label}: {}\n", options.join(", "))
}

pub fn results(films: &[FilmSummary]) -> String {
    if films.is_empty() {
        return "No results found for this query.\n".to_string();
    }

    let mut out = String::from("\nSearch results:\n");
    for film in films {
        let mut fields = vec![
            format!("ID: {}", film.film_id),
            format!("Title: {}", film.title),
            format!("Year: {}", film.release_year.map_or_else(|| "-".to_string(), |y| y.to_string())),
        ];
        if let Some(genre) = &film.genre {
            fields.push(format!("Genre: {genre}"));
        }
        if let Some(rating) = &film.rating {
            fields.push(format!("Rating: {rating}"));
        }
        let _ = writeln!(out, "{}", fields.join(", "));
    }
    out
}

pub fn popular(searches: &[PopularSearch]) -> String {
    if searches.is_empty() {
        return "No searches recorded yet.\n".to_string();
    }

    let mut out = String::from("\nPopular searches:\n");
    for search in searches {
        let _ = writeln!(out, "Query: {}, Frequency: {}", search.search_term, search.frequency);
    }
    out
}
