use anyhow::Result;
use clap::Parser;
use showroom_cli::{connect, init_tracing, palette};
use showroom_core::models::STANDARD_COLORS;
use showroom_db::ColorRepository;

#[derive(Parser, Debug)]
#[command(name = "seed_colors")]
#[command(about = "Insert the standard colour palette, skipping colours that already exist")]
struct Args {
    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Extra colours to add on top of the standard palette
    #[arg(long, value_delimiter = ',')]
    extra: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let pool = connect(&args.database_url).await?;
    let colors = ColorRepository::new(pool);

    let names = palette(
        STANDARD_COLORS
            .iter()
            .copied()
            .chain(args.extra.iter().map(String::as_str)),
    );

    let mut inserted = 0;
    for name in &names {
        if colors.insert_if_missing(name).await? {
            inserted += 1;
            tracing::info!(color = %name, "Inserted");
        }
    }

    println!(
        "Seeded {} colour(s), {} already present",
        inserted,
        names.len() - inserted
    );
    Ok(())
}
