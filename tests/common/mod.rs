#![allow(dead_code)]

use std::ops::Deref;

use filmsearch::{
    CatalogSearch, Config, db,
    entities::{actor, category, film, film_actor, film_category},
    models::RecordPolicy,
};
use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, Schema, Set};
use tempfile::TempDir;

const ACTION_2006_FILMS: u16 = 15;

pub struct TestCatalog {
    pub dir: TempDir,
    pub catalog: CatalogSearch,
}

impl Deref for TestCatalog {
    type Target = CatalogSearch;

    fn deref(&self) -> &Self::Target {
        &self.catalog
    }
}

pub fn sqlite_config(dir: &TempDir, policy: RecordPolicy) -> Config {
    Config {
        database_url: format!("sqlite://{}?mode=rwc", dir.path().join("catalog.db").display()),
        max_connections: 1,
        record_policy: policy,
    }
}

/// Seeded catalog with the search log in place.
pub async fn seeded_catalog(policy: RecordPolicy) -> TestCatalog {
    let dir = tempfile::tempdir().unwrap();
    let config = sqlite_config(&dir, policy);
    let conn = db::connect(&config).await.unwrap();
    create_catalog_tables(&conn).await;
    seed(&conn).await;
    db::ensure_schema(&conn).await.unwrap();
    TestCatalog { dir, catalog: CatalogSearch::new(conn, policy) }
}

/// Search log only, no film tables.
pub async fn empty_catalog() -> TestCatalog {
    let dir = tempfile::tempdir().unwrap();
    let config = sqlite_config(&dir, RecordPolicy::Always);
    let catalog = CatalogSearch::open(&config).await.unwrap();
    TestCatalog { dir, catalog }
}

pub async fn create_catalog_tables(conn: &DatabaseConnection) {
    let backend = conn.get_database_backend();
    let schema = Schema::new(backend);
    let statements = [
        schema.create_table_from_entity(film::Entity),
        schema.create_table_from_entity(category::Entity),
        schema.create_table_from_entity(actor::Entity),
        schema.create_table_from_entity(film_category::Entity),
        schema.create_table_from_entity(film_actor::Entity),
    ];
    for statement in statements {
        conn.execute(backend.build(&statement)).await.unwrap();
    }
}

struct FilmFixture {
    id: u16,
    title: String,
    description: Option<&'static str>,
    year: u16,
    rating: &'static str,
    category: u8,
    actors: &'static [u16],
}

// Categories: 1 Action, 2 Comedy, 3 Drama.
// Actors: 1 PENELOPE GUINESS, 2 NICK WAHLBERG, 3 ED CHASE.
fn fixtures() -> Vec<FilmFixture> {
    let mut films: Vec<FilmFixture> = (1..=ACTION_2006_FILMS)
        .map(|i| FilmFixture {
            id: i,
            title: format!("ACTION FILM {i}"),
            description: Some("An Epic Story of a Stuntman"),
            year: 2006,
            rating: "PG-13",
            category: 1,
            actors: &[1],
        })
        .collect();

    films.push(FilmFixture {
        id: 16,
        title: "ACADEMY DINOSAUR".to_string(),
        description: Some("A Epic Drama of a Feminist And a Mad Scientist"),
        year: 2006,
        rating: "PG",
        category: 3,
        actors: &[2],
    });
    films.push(FilmFixture {
        id: 17,
        title: "ACE GOLDFINGER".to_string(),
        description: Some("A Astounding Epistle of a Database Administrator"),
        year: 2005,
        rating: "G",
        category: 1,
        actors: &[3],
    });
    films.push(FilmFixture {
        id: 18,
        title: "ZORRO ARK".to_string(),
        description: None,
        year: 2006,
        rating: "NC-17",
        category: 2,
        actors: &[2, 3],
    });
    films
}

pub async fn seed(conn: &DatabaseConnection) {
    category::Entity::insert_many(["Action", "Comedy", "Drama"].into_iter().enumerate().map(
        |(i, name)| category::ActiveModel {
            category_id: Set(i as u8 + 1),
            name: Set(name.to_string()),
        },
    ))
    .exec_without_returning(conn)
    .await
    .unwrap();

    actor::Entity::insert_many(
        [("PENELOPE", "GUINESS"), ("NICK", "WAHLBERG"), ("ED", "CHASE")].into_iter().enumerate().map(
            |(i, (first, last))| actor::ActiveModel {
                actor_id: Set(i as u16 + 1),
                first_name: Set(first.to_string()),
                last_name: Set(last.to_string()),
            },
        ),
    )
    .exec_without_returning(conn)
    .await
    .unwrap();

    let films = fixtures();

    film::Entity::insert_many(films.iter().map(|f| film::ActiveModel {
        film_id: Set(f.id),
        title: Set(f.title.clone()),
        description: Set(f.description.map(str::to_string)),
        release_year: Set(Some(f.year)),
        rating: Set(Some(f.rating.to_string())),
    }))
    .exec_without_returning(conn)
    .await
    .unwrap();

    film_category::Entity::insert_many(films.iter().map(|f| film_category::ActiveModel {
        film_id: Set(f.id),
        category_id: Set(f.category),
    }))
    .exec_without_returning(conn)
    .await
    .unwrap();

    film_actor::Entity::insert_many(films.iter().flat_map(|f| {
        f.actors.iter().map(move |&actor_id| film_actor::ActiveModel {
            actor_id: Set(actor_id),
            film_id: Set(f.id),
        })
    }))
    .exec_without_returning(conn)
    .await
    .unwrap();
}
