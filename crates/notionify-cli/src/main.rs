use clap::Parser;
use tracing_subscriber::EnvFilter;

use notionify::NotionHelper;

/// Query every row of a database and print it as JSON.
#[derive(Parser, Debug)]
#[command(name = "notionify-cli")]
struct Args {
    /// Database ID, or a database title when --discover is set
    #[arg(long, default_value = "test")]
    database: String,

    /// Index databases under the root page and resolve --database by title
    #[arg(long)]
    discover: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut helper = NotionHelper::from_env()?;

    let database_id = if args.discover {
        helper.index_child_databases().await?;
        match helper.database_id(&args.database) {
            Some(id) => id.to_string(),
            None => anyhow::bail!("no database titled '{}' under the root page", args.database),
        }
    } else {
        args.database.clone()
    };

    let rows = helper.query_all(&database_id).await?;
    println!("{}", serde_json::to_string_pretty(&rows)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_query_test_database() {
        let args = Args::parse_from(["notionify-cli"]);
        assert_eq!(args.database, "test");
        assert!(!args.discover);
        assert_eq!(args.log_level, "warn");
    }

    #[test]
    fn test_discover_by_title() {
        let args = Args::parse_from(["notionify-cli", "--database", "Books", "--discover"]);
        assert_eq!(args.database, "Books");
        assert!(args.discover);
    }
}
