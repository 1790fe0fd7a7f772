use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use time::OffsetDateTime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jobs_core::{QueryExecutor, SearchCriteria};

use jobs_client::{
    transform, url_codec, ClientConfig, HttpQueryExecutor, PreconditionError, SearchCache,
    SearchEvent, SearchOrchestrator,
};

#[derive(Parser)]
#[command(name = "jobs", about = "Search job postings from the command line")]
struct Opts {
    /// Server URL, overrides the config file
    #[arg(long)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a search described by a query string, e.g. "q=rust&mode=remote&p=2"
    Search {
        query_string: String,
        /// Print the display rows as JSON
        #[arg(long)]
        json: bool,
    },
    /// Job counts per company for a search
    Companies { query_string: String },
    /// Print the canonical form of a query string
    Canonical { query_string: String },
}

/// Facet input for a query string: its criteria without the company filter,
/// built without running the page search.
fn facet_criteria(
    query_string: &str,
    page_size: u32,
    now: OffsetDateTime,
) -> Result<SearchCriteria, PreconditionError> {
    let (filters, page) = url_codec::decode(query_string);
    Ok(filters.to_criteria(page, page_size, now)?.without_company())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,jobs_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let opts = Opts::parse();
    let mut config = ClientConfig::load()?;
    if let Some(api_url) = opts.api_url {
        config.api_url = api_url;
    }

    if let Command::Canonical { query_string } = &opts.command {
        let (state, page) = url_codec::decode(query_string);
        println!("{}", url_codec::encode(&state, page));
        return Ok(());
    }

    let executor = HttpQueryExecutor::new(
        &config.api_url,
        Duration::from_secs(config.request_timeout_secs),
    )
    .with_context(|| format!("Invalid api_url: {}", config.api_url))?;

    match opts.command {
        Command::Search { query_string, json } => {
            let mut orchestrator =
                SearchOrchestrator::new(executor, SearchCache::new(&config.cache))
                    .with_page_size(config.page_size);
            let outcome = orchestrator.run(SearchEvent::Mount(query_string)).await?;
            if let Some(error) = outcome.error {
                anyhow::bail!("Search failed ({:?}): {}", error.kind(), error.message());
            }

            let now = OffsetDateTime::now_utc();
            let jobs: Vec<_> = outcome.page.rows.iter().map(|row| transform(row, now)).collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&jobs)?);
            } else {
                for job in &jobs {
                    println!("{:>8}  {} @ {} ({})", job.id, job.title, job.company_name, job.posted);
                }
                let page = &outcome.page;
                println!(
                    "\n{} of {} results{}",
                    page.rows.len(),
                    page.total,
                    if page.has_more { ", more available" } else { "" }
                );
            }
        }
        Command::Companies { query_string } => {
            let criteria =
                facet_criteria(&query_string, config.page_size, OffsetDateTime::now_utc())?;
            for facet in executor.facet_companies(&criteria, None).await? {
                println!("{:>6}  {}", facet.job_count, facet.company_name);
            }
        }
        Command::Canonical { .. } => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobs_core::WorkMode;

    #[test]
    fn facet_criteria_keep_filters_but_drop_companies() {
        let criteria = facet_criteria(
            "q=rust&mode=remote&company=Acme&p=2",
            20,
            OffsetDateTime::now_utc(),
        )
        .unwrap();

        assert_eq!(criteria.query, "rust");
        assert_eq!(criteria.work_modes, vec![WorkMode::Remote]);
        assert!(criteria.companies.is_empty());
    }

    #[test]
    fn facet_criteria_need_a_query() {
        assert_eq!(
            facet_criteria("mode=remote", 20, OffsetDateTime::now_utc()),
            Err(PreconditionError::EmptyQuery)
        );
    }
}
