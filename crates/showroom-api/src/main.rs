use showroom_api::setup;
use showroom_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    let (_state, router, cleanup) = setup::initialize_app(&config).await?;

    setup::server::start_server(&config, router, cleanup).await?;

    Ok(())
}
