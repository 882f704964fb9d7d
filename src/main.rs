use anyhow::Context;
use filmsearch::{
    CatalogSearch, Config,
    models::{Rating, SearchKind, genre_year_term, normalize_rating},
    terminal::{self, MenuChoice},
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin, Stdout};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "warn,filmsearch=info,sqlx=warn".to_string()),
        )
        .init();

    let config = Config::from_env().context("invalid configuration")?;
    let catalog = CatalogSearch::open(&config).await.context("cannot start film search")?;

    let outcome = {
        let mut session = Session {
            catalog: &catalog,
            input: BufReader::new(tokio::io::stdin()).lines(),
            output: tokio::io::stdout(),
        };
        session.run().await
    };

    if let Err(err) = catalog.close().await {
        tracing::warn!(error = %err, "failed to close database connection");
    }
    outcome
}

struct Session<'a> {
    catalog: &'a CatalogSearch,
    input: Lines<BufReader<Stdin>>,
    output: Stdout,
}

impl Session<'_> {
    async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            self.write(&terminal::menu()).await?;
            let Some(line) = self.prompt("Your choice: ").await? else {
                break;
            };

            match MenuChoice::parse(&line) {
                Some(MenuChoice::Keyword) => self.keyword().await?,
                Some(MenuChoice::GenreYear) => self.genre_year().await?,
                Some(MenuChoice::Actor) => self.actor().await?,
                Some(MenuChoice::Rating) => self.rating().await?,
                Some(MenuChoice::Popular) => {
                    let searches = self.catalog.popular_searches().await;
                    self.write(&terminal::popular(&searches)).await?;
                },
                Some(MenuChoice::Exit) => break,
                None => self.write("Invalid choice, try again.\n").await?,
            }
        }

        self.write("Goodbye.\n").await
    }

    async fn keyword(&mut self) -> anyhow::Result<()> {
        let Some(term) = self.prompt("Keyword: ").await? else {
            return Ok(());
        };
        let term = term.trim();
        let films = self.catalog.search_by_keyword(term).await;
        self.catalog.record_outcome(term, SearchKind::Keyword, films.len()).await;
        self.write(&terminal::results(&films)).await
    }

    async fn genre_year(&mut self) -> anyhow::Result<()> {
        let genres = self.catalog.available_genres().await;
        self.write(&terminal::options_line("genres", &genres)).await?;
        let Some(genre) = self.prompt("Genre: ").await? else {
            return Ok(());
        };
        let Some(year) = self.prompt("Year: ").await? else {
            return Ok(());
        };
        let Ok(year) = year.trim().parse::<i32>() else {
            return self.write("Invalid year, try again.\n").await;
        };

        let genre = genre.trim();
        let films = self.catalog.search_by_genre_and_year(genre, year).await;
        self.catalog
            .record_outcome(&genre_year_term(genre, year), SearchKind::GenreYear, films.len())
            .await;
        self.write(&terminal::results(&films)).await
    }

    async fn actor(&mut self) -> anyhow::Result<()> {
        let Some(name) = self.prompt("Actor name: ").await? else {
            return Ok(());
        };
        let name = name.trim();
        let films = self.catalog.search_by_actor(name).await;
        self.catalog.record_outcome(name, SearchKind::Actor, films.len()).await;
        self.write(&terminal::results(&films)).await
    }

    async fn rating(&mut self) -> anyhow::Result<()> {
        let ratings = Rating::options(self.catalog.available_ratings().await);
        self.write(&terminal::options_line("ratings", &ratings)).await?;
        let Some(raw) = self.prompt("Rating: ").await? else {
            return Ok(());
        };
        // Unknown ratings are searched as typed and simply find nothing.
        let rating = Rating::parse(&raw)
            .map_or_else(|| normalize_rating(&raw), |r| r.as_str().to_string());
        let films = self.catalog.search_by_rating(&rating).await;
        self.catalog.record_outcome(&rating, SearchKind::Rating, films.len()).await;
        self.write(&terminal::results(&films)).await
    }

    /// `None` on end of input.
    async fn prompt(&mut self, text: &str) -> anyhow::Result<Option<String>> {
        self.write(text).await?;
        Ok(self.input.next_line().await?)
    }

    async fn write(&mut self, text: &str) -> anyhow::Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.flush().await?;
        Ok(())
    }
}
