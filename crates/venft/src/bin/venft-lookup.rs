//! Look up a veNFT lock position from the command line.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::debug;

use venft::display::{self, ResultView};
use venft::{logging, Config, LookupQuery, LookupService};

#[derive(Parser)]
#[command(name = "venft-lookup")]
#[command(about = "Look up a veNFT lock position across EVM networks")]
#[command(version)]
struct Cli {
    /// Registry key, e.g. veFVM or veAero
    #[arg(long)]
    venft: Option<String>,

    /// Token id (decimal)
    #[arg(long)]
    id: Option<String>,

    /// Query string or page URL carrying `venft` and `id`
    #[arg(long, conflicts_with_all = ["venft", "id"])]
    query: Option<String>,

    /// Print the known networks and keys, then exit
    #[arg(long)]
    list: bool,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the raw result as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn lookup_query(&self) -> anyhow::Result<LookupQuery> {
        match &self.query {
            Some(q) if q.contains("://") => Ok(LookupQuery::parse_url(q)?),
            Some(q) => Ok(LookupQuery::from_query(q)),
            None => Ok(LookupQuery {
                venft: self.venft.clone(),
                id: self.id.clone(),
            }),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => Config::default(),
    };
    logging::init_logging(&config.log_level)?;
    debug!(config = ?cli.config, "configuration loaded");

    let service = LookupService::from_config(&config)?;

    if cli.list {
        for group in display::group_by_network(service.registry()) {
            println!("{}: {}", group.network, group.keys.join(", "));
        }
        return Ok(());
    }

    let query = cli.lookup_query()?;
    println!("{}", display::heading(query.venft()));
    if !query.is_complete() {
        bail!("both a veNFT key and a token id are required (see --help)");
    }

    let Some(result) = service.resolve_query(&query).await? else {
        bail!("unknown veNFT key {:?} (see --list)", query.venft().unwrap_or_default());
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let key = query.venft().unwrap_or_default();
    let view = ResultView::new(key, &result);
    println!("{}: {}", view.title, view.id);
    match &view.owner_link {
        Some(link) => println!("Owner: {} ({link})", view.owner),
        None => println!("Owner: {}", view.owner),
    }
    println!("Balance: {}", display::format_grouped(&view.balance));
    match view.usd_value {
        Some(usd) => println!(
            "{}: {} (${})",
            view.locked_label,
            display::format_grouped(&view.locked),
            display::format_grouped(&format!("{usd:.3}"))
        ),
        None => println!("{}: {}", view.locked_label, display::format_grouped(&view.locked)),
    }
    println!("Unlock: {}", view.unlock);
    Ok(())
}
