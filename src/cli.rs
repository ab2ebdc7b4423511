use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use crate::{
  config::RootConfig,
  filter::{FilterKind, JobListing},
  ingest::ingest_all,
  job::{sort_newest_first, JobPost},
  server::ServerConfig,
};

#[derive(Parser)]
#[clap(version, about)]
pub struct Cli {
  #[clap(subcommand)]
  subcmd: SubCommand,

  /// YAML config file; the built-in feeds are used when omitted
  #[clap(long, short, env = "JOB_FUNNEL_CONFIG")]
  config: Option<PathBuf>,
}

#[derive(Parser)]
enum SubCommand {
  /// Run one ingestion cycle and print the result
  Fetch(FetchConfig),
  /// Serve job listings over HTTP
  Server(ServerConfig),
}

#[derive(Parser)]
struct FetchConfig {
  /// One of all, front-end, back-end, full-stack
  #[clap(long, short, default_value = "all")]
  filter: FilterKind,
  /// Limit the number of posts shown
  #[clap(long, short('n'))]
  limit: Option<usize>,
  /// Print the listing as JSON
  #[clap(long, short)]
  json: bool,
}

impl Cli {
  pub async fn run(self) -> anyhow::Result<()> {
    let root_config = match &self.config {
      Some(path) => RootConfig::load_from_file(path)
        .with_context(|| format!("failed to load {}", path.display()))?,
      None => RootConfig::default(),
    };

    match self.subcmd {
      SubCommand::Fetch(fetch_config) => fetch(root_config, fetch_config).await,
      SubCommand::Server(server_config) => {
        server_config.run(root_config).await?;
        Ok(())
      }
    }
  }
}

async fn fetch(
  root_config: RootConfig,
  fetch_config: FetchConfig,
) -> anyhow::Result<()> {
  let client = root_config
    .client
    .build()
    .context("failed to build HTTP client")?;

  let mut posts = ingest_all(&client, &root_config.feeds).await;
  sort_newest_first(&mut posts);

  let listing =
    JobListing::new(posts, fetch_config.filter, fetch_config.limit);

  if fetch_config.json {
    println!("{}", serde_json::to_string_pretty(&listing)?);
  } else {
    print!("{}", render_text(&listing));
  }

  Ok(())
}

fn render_text(listing: &JobListing) -> String {
  let counts = listing
    .counts
    .iter()
    .map(|(kind, count)| format!("{kind}: {count}"))
    .collect::<Vec<_>>()
    .join(", ");

  let mut out =
    format!("{} {} posts ({counts})\n", listing.count, listing.filter);
  for post in &listing.jobs {
    out.push('\n');
    out.push_str(&render_post(post));
  }
  out
}

fn render_post(post: &JobPost) -> String {
  let mut out =
    format!("{} [{}]\n  {}\n", post.title(), post.source(), post.link());
  if let Some(pub_date) = post.pub_date() {
    out.push_str(&format!("  posted: {pub_date}\n"));
  }
  if !post.categories().is_empty() {
    out.push_str(&format!("  tags: {}\n", post.categories().join(", ")));
  }
  out
}
