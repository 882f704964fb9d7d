use anyhow::{Context, bail};

use crate::models::RecordPolicy;

const DEFAULT_DATABASE_URL: &str = "sqlite://filmsearch.db?mode=rwc";

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub record_policy: RecordPolicy,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source, so parsing can be exercised
    /// without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = match lookup("DATABASE_URL") {
            Some(url) => url,
            None => match lookup("DB_HOST") {
                Some(host) => mysql_url(&host, &lookup)?,
                None => DEFAULT_DATABASE_URL.to_string(),
            },
        };

        let max_connections: u32 = lookup("DB_MAX_CONNECTIONS")
            .map(|s| s.parse::<u32>())
            .transpose()
            .context("DB_MAX_CONNECTIONS")?
            .unwrap_or(1);

        let record_empty = lookup("RECORD_EMPTY_SEARCHES")
            .map(|s| parse_bool(&s))
            .transpose()
            .context("RECORD_EMPTY_SEARCHES")?
            .unwrap_or(true);

        Ok(Self {
            database_url,
            max_connections: max_connections.max(1),
            record_policy: if record_empty {
                RecordPolicy::Always
            } else {
                RecordPolicy::NonEmptyOnly
            },
        })
    }
}

fn mysql_url<F>(host: &str, lookup: &F) -> anyhow::Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let port: u16 =
        lookup("DB_PORT").unwrap_or_else(|| "3306".to_string()).parse().context("DB_PORT")?;
    let user = lookup("DB_USER").context("DB_USER must be set when DB_HOST is")?;
    let password = lookup("DB_PASSWORD").unwrap_or_default();
    let name = lookup("DB_NAME").context("DB_NAME must be set when DB_HOST is")?;

    Ok(format!(
        "mysql://{}:{}@{host}:{port}/{}",
        urlencoding::encode(&user),
        urlencoding::encode(&password),
        urlencoding::encode(&name),
    ))
}

fn parse_bool(raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("expected a boolean, got {other:?}"),
    }
}

/// Replaces the password of a connection URL so it can be logged or shown to the user.
pub fn redact_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let Some((credentials, host)) = rest.rsplit_once('@') else {
        return url.to_string();
    };
    match credentials.split_once(':') {
        Some((user, _)) => format!("{scheme}://{user}:***@{host}"),
        None => url.to_string(),
    }
}
