use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
    sea_query::{Alias, Expr, Func, SimpleExpr},
};
use tracing::{debug, warn};

use crate::{
    config::Config,
    db,
    entities::{actor, category, film, film_actor, film_category, search_log},
    error::{CatalogError, CatalogResult},
    models::{
        FilmRow, FilmSummary, GenreFilmRow, PAGE_SIZE, PopularSearch, RatedFilmRow, RecordPolicy,
        SearchKind,
    },
};

/// Read access to the film catalog plus the search log it keeps alongside.
///
/// Holds one connection for the lifetime of the run. Query failures are logged and
/// surface as empty results; only connecting and schema setup are fatal.
pub struct CatalogSearch {
    db: DatabaseConnection,
    policy: RecordPolicy,
}

impl CatalogSearch {
    pub fn new(db: DatabaseConnection, policy: RecordPolicy) -> Self {
        Self { db, policy }
    }

    /// Connects and makes sure the search log exists.
    pub async fn open(config: &Config) -> CatalogResult<Self> {
        let db = db::connect(config).await?;
        db::ensure_schema(&db).await?;
        Ok(Self::new(db, config.record_policy))
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn ensure_schema(&self) -> CatalogResult<()> {
        db::ensure_schema(&self.db).await
    }

    /// Substring match on title or description. `%` and `_` in `term` keep their
    /// wildcard meaning.
    pub async fn search_by_keyword(&self, term: &str) -> Vec<FilmSummary> {
        recover("search_by_keyword", self.try_search_by_keyword(term).await)
    }

    pub async fn try_search_by_keyword(&self, term: &str) -> CatalogResult<Vec<FilmSummary>> {
        let pattern = contains_pattern(term);
        let rows = film_columns(film::Entity::find())
            .filter(
                Condition::any()
                    .add(film::Column::Title.like(pattern.as_str()))
                    .add(film::Column::Description.like(pattern.as_str())),
            )
            .order_by_asc(film::Column::FilmId)
            .limit(PAGE_SIZE)
            .into_model::<FilmRow>()
            .all(&self.db)
            .await
            .map_err(CatalogError::query("search_by_keyword"))?;

        debug!(term = %term, rows = rows.len(), "keyword search");
        Ok(rows.into_iter().map(FilmSummary::from).collect())
    }

    /// Exact match on category name and release year. Case sensitivity of `genre`
    /// follows the store's collation.
    pub async fn search_by_genre_and_year(&self, genre: &str, year: i32) -> Vec<FilmSummary> {
        recover("search_by_genre_and_year", self.try_search_by_genre_and_year(genre, year).await)
    }

    pub async fn try_search_by_genre_and_year(
        &self,
        genre: &str,
        year: i32,
    ) -> CatalogResult<Vec<FilmSummary>> {
        let rows = film_columns(film::Entity::find())
            .column_as(category::Column::Name, "genre")
            .join(JoinType::InnerJoin, film::Relation::FilmCategory.def())
            .join(JoinType::InnerJoin, film_category::Relation::Category.def())
            .filter(category::Column::Name.eq(genre))
            .filter(film::Column::ReleaseYear.eq(year))
            .order_by_asc(film::Column::FilmId)
            .limit(PAGE_SIZE)
            .into_model::<GenreFilmRow>()
            .all(&self.db)
            .await
            .map_err(CatalogError::query("search_by_genre_and_year"))?;

        debug!(genre = %genre, year, rows = rows.len(), "genre and year search");
        Ok(rows.into_iter().map(FilmSummary::from).collect())
    }

    /// Substring match on `first_name || ' ' || last_name`.
    pub async fn search_by_actor(&self, actor_name: &str) -> Vec<FilmSummary> {
        recover("search_by_actor", self.try_search_by_actor(actor_name).await)
    }

    pub async fn try_search_by_actor(&self, actor_name: &str) -> CatalogResult<Vec<FilmSummary>> {
        let full_name: [SimpleExpr; 3] = [
            Expr::col((actor::Entity, actor::Column::FirstName)).into(),
            Expr::val(" ").into(),
            Expr::col((actor::Entity, actor::Column::LastName)).into(),
        ];
        let full_name = Func::cust(Alias::new("CONCAT")).args(full_name);

        // A film with several matching actors is listed once.
        let rows = film_columns(film::Entity::find())
            .distinct()
            .join(JoinType::InnerJoin, film::Relation::FilmActor.def())
            .join(JoinType::InnerJoin, film_actor::Relation::Actor.def())
            .filter(Expr::expr(full_name).like(contains_pattern(actor_name)))
            .order_by_asc(film::Column::FilmId)
            .limit(PAGE_SIZE)
            .into_model::<FilmRow>()
            .all(&self.db)
            .await
            .map_err(CatalogError::query("search_by_actor"))?;

        debug!(actor = %actor_name, rows = rows.len(), "actor search");
        Ok(rows.into_iter().map(FilmSummary::from).collect())
    }

    /// Exact match on the rating column. Callers normalize the input first
    /// (see [`crate::models::normalize_rating`]).
    pub async fn search_by_rating(&self, rating: &str) -> Vec<FilmSummary> {
        recover("search_by_rating", self.try_search_by_rating(rating).await)
    }

    pub async fn try_search_by_rating(&self, rating: &str) -> CatalogResult<Vec<FilmSummary>> {
        let rows = film_columns(film::Entity::find())
            .column(film::Column::Rating)
            .filter(film::Column::Rating.eq(rating))
            .order_by_asc(film::Column::FilmId)
            .limit(PAGE_SIZE)
            .into_model::<RatedFilmRow>()
            .all(&self.db)
            .await
            .map_err(CatalogError::query("search_by_rating"))?;

        debug!(rating = %rating, rows = rows.len(), "rating search");
        Ok(rows.into_iter().map(FilmSummary::from).collect())
    }

    /// Appends one entry to the search log. Failures are logged and swallowed so that a
    /// broken log never hides search results from the user.
    pub async fn record_search(&self, term: &str, kind: SearchKind) {
        self.record_logged(term, kind).await;
    }

    pub async fn try_record_search(&self, term: &str, kind: SearchKind) -> CatalogResult<()> {
        let entry = search_log::ActiveModel {
            search_term: Set(term.to_string()),
            search_type: Set(kind.as_str().to_string()),
            ..Default::default()
        };

        search_log::Entity::insert(entry)
            .exec(&self.db)
            .await
            .map_err(CatalogError::query("record_search"))?;

        debug!(term = %term, kind = %kind, "recorded search");
        Ok(())
    }

    /// Records a finished search according to the configured [`RecordPolicy`]. Returns
    /// whether an entry was written.
    pub async fn record_outcome(&self, term: &str, kind: SearchKind, hits: usize) -> bool {
        if !self.policy.should_record(hits) {
            debug!(term = %term, kind = %kind, "skipping log entry for empty search");
            return false;
        }
        self.record_logged(term, kind).await
    }

    async fn record_logged(&self, term: &str, kind: SearchKind) -> bool {
        match self.try_record_search(term, kind).await {
            Ok(()) => true,
            Err(err) => {
                warn!(term = %term, kind = %kind, error = %err, "failed to record search");
                false
            },
        }
    }

    /// Top ten terms by all-time frequency, ties broken by term ascending. Terms are
    /// counted regardless of search type.
    pub async fn popular_searches(&self) -> Vec<PopularSearch> {
        recover("popular_searches", self.try_popular_searches().await)
    }

    pub async fn try_popular_searches(&self) -> CatalogResult<Vec<PopularSearch>> {
        let frequency = Expr::col(search_log::Column::Id).count();

        search_log::Entity::find()
            .select_only()
            .column(search_log::Column::SearchTerm)
            .column_as(frequency.clone(), "frequency")
            .group_by(search_log::Column::SearchTerm)
            .order_by_desc(frequency)
            .order_by_asc(search_log::Column::SearchTerm)
            .limit(PAGE_SIZE)
            .into_model::<PopularSearch>()
            .all(&self.db)
            .await
            .map_err(CatalogError::query("popular_searches"))
    }

    pub async fn available_genres(&self) -> Vec<String> {
        recover("available_genres", self.try_available_genres().await)
    }

    pub async fn try_available_genres(&self) -> CatalogResult<Vec<String>> {
        category::Entity::find()
            .select_only()
            .column(category::Column::Name)
            .distinct()
            .order_by_asc(category::Column::Name)
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .map_err(CatalogError::query("available_genres"))
    }

    pub async fn available_ratings(&self) -> Vec<String> {
        recover("available_ratings", self.try_available_ratings().await)
    }

    pub async fn try_available_ratings(&self) -> CatalogResult<Vec<String>> {
        film::Entity::find()
            .select_only()
            .column(film::Column::Rating)
            .distinct()
            .filter(film::Column::Rating.is_not_null())
            .order_by_asc(film::Column::Rating)
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .map_err(CatalogError::query("available_ratings"))
    }

    /// Number of entries in the search log.
    pub async fn logged_searches(&self) -> CatalogResult<u64> {
        search_log::Entity::find()
            .count(&self.db)
            .await
            .map_err(CatalogError::query("logged_searches"))
    }

    /// Releases the connection.
    pub async fn close(self) -> Result<(), DbErr> {
        self.db.close().await
    }
}

fn film_columns(select: sea_orm::Select<film::Entity>) -> sea_orm::Select<film::Entity> {
    select.select_only().columns([
        film::Column::FilmId,
        film::Column::Title,
        film::Column::Description,
        film::Column::ReleaseYear,
    ])
}

fn contains_pattern(term: &str) -> String {
    format!("%{term}%")
}

fn recover<T>(operation: &str, result: CatalogResult<Vec<T>>) -> Vec<T> {
    match result {
        Ok(rows) => rows,
        Err(err) => {
            warn!(operation, error = %err, "query failed, returning no rows");
            Vec::new()
        },
    }
}
