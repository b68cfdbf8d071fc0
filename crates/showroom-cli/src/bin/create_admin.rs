use anyhow::{Context, Result};
use clap::Parser;
use showroom_api::auth::password::hash_password;
use showroom_cli::{connect, init_tracing};
use showroom_core::models::{CreateUserRequest, UserRole};
use showroom_db::UserRepository;
use validator::Validate;

#[derive(Parser, Debug)]
#[command(name = "create_admin")]
#[command(about = "Create an admin account for the admin panel")]
struct Args {
    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[arg(long)]
    name: String,

    #[arg(long)]
    email: String,

    #[arg(long)]
    phone: String,

    /// Read from ADMIN_PASSWORD when not given
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    password: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let request = CreateUserRequest {
        name: args.name.trim().to_string(),
        email: args.email.trim().to_string(),
        phone_number: args.phone.trim().to_string(),
        password: args.password,
        role: UserRole::Admin,
    };
    request.validate().context("Invalid admin details")?;

    let pool = connect(&args.database_url).await?;
    let hash = hash_password(&request.password)?;
    let user = UserRepository::new(pool)
        .create(
            &request.name,
            &request.email,
            &request.phone_number,
            &hash,
            request.role,
        )
        .await?;

    println!("Created admin {} ({})", user.email, user.id);
    Ok(())
}
