use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use deadpool_postgres::{Config, Pool, PoolConfig, Runtime};
use tokio_postgres::NoTls;

/// Everything read from the environment once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Posts per listing page.
    pub page_size: i64,
    /// How long the cached home page stays valid.
    pub cache_ttl: Duration,
    /// Seconds an issued bearer token stays valid.
    pub token_ttl_secs: u64,
    /// Directory uploaded post images are written under.
    pub media_root: PathBuf,
    /// Shared secret for the /internal/ operator routes.
    pub admin_token: Option<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let page_size = env_parse("POSTS_PER_PAGE", 10)?;
        let cache_ttl_secs: u64 = env_parse("INDEX_CACHE_TTL_SECS", 20)?;
        let token_ttl_secs = env_parse("TOKEN_TTL_SECS", 60 * 60 * 24)?;
        let media_root = env::var("MEDIA_ROOT").unwrap_or_else(|_| "media".into());
        let admin_token = env::var("ADMIN_TOKEN").ok().filter(|t| !t.is_empty());

        Ok(Settings {
            page_size,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            token_ttl_secs,
            media_root: PathBuf::from(media_root),
            admin_token,
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} is not a valid value", key)),
        Err(_) => Ok(default),
    }
}

pub fn get_pg_pool() -> Result<Pool> {
    let mut cfg = Config::new();
    cfg.host = Some(env::var("PG_HOST").context("PG_HOST not set")?);
    cfg.user = Some(env::var("PG_USER").context("PG_USER not set")?);
    cfg.password = env::var("PG_PASS").ok();
    cfg.dbname = Some(env::var("PG_DB").context("PG_DB not set")?);

    if cfg.pool.is_none() {
        cfg.pool = Some(PoolConfig::default());
    }
    if let Some(ref mut pcfg) = cfg.pool {
        pcfg.max_size = 16;
    }

    cfg.create_pool(Some(Runtime::Tokio1), NoTls)
        .context("failed to create postgres pool")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_parse_falls_back_to_default() {
        let v: i64 = env_parse("YATUBE_TEST_MISSING_KEY", 10).unwrap();
        assert_eq!(v, 10);
    }
}
