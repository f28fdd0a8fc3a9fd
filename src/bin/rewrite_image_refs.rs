use clap::Parser;
use tracing_subscriber::EnvFilter;

use lb_premium::config::Config;
use lb_premium::entities::setup_schema;
use lb_premium::maintenance::{parse_extension, rewrite_image_refs, RewriteOptions};
use lb_premium::{connect, StartupError};

/// Rewrite image paths stored in the database to a new file extension.
#[derive(Parser, Debug)]
#[command(name = "rewrite_image_refs")]
struct Args {
    /// Extensions to replace, comma separated
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "jpg,jpeg,png",
        value_parser = parse_extension
    )]
    from: Vec<String>,

    /// Extension to write instead
    #[arg(long, default_value = "webp", value_parser = parse_extension)]
    to: String,

    /// Report what would change without writing
    #[arg(long)]
    dry_run: bool,

    /// Overrides DATABASE_URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;
    let database_url = args.database_url.unwrap_or(config.database_url);

    let db = connect(&database_url).await?;
    setup_schema(&db).await?;

    let options = RewriteOptions {
        from: args.from,
        to: args.to,
        dry_run: args.dry_run,
    };
    let report = rewrite_image_refs(&db, &options).await?;

    for (table, count) in &report.tables {
        println!("{table}: {count}");
    }
    let verb = if options.dry_run { "would change" } else { "changed" };
    println!("{verb} {} rows", report.total());
    Ok(())
}
