use crate::{pkg::server::listen, prelude::Result};
use clap::{Parser, Subcommand};

pub(crate) mod migrate;

#[derive(Parser)]
#[command(about = "job board web service")]
struct Cmd {
    #[command(subcommand)]
    command: Option<SubCommandType>,
}

#[derive(Subcommand)]
enum SubCommandType {
    Listen,
    Migrate,
    CreateAdmin {
        email: String,
        name: String,
        password: String,
    },
}

pub async fn run() -> Result<()> {
    let args = Cmd::parse();
    match args.command {
        Some(SubCommandType::Listen) => {
            listen().await?;
        }
        Some(SubCommandType::Migrate) => {
            migrate::apply().await?;
        }
        Some(SubCommandType::CreateAdmin {
            email,
            name,
            password,
        }) => {
            create_admin(&email, &name, &password).await?;
        }
        None => {
            tracing::error!("no subcommand passed");
        }
    }
    Ok(())
}

async fn create_admin(email: &str, name: &str, password: &str) -> Result<()> {
    use crate::pkg::internal::auth::{Role, User};
    use crate::pkg::server::state::db_pool;

    let pool = db_pool()?;
    let mut conn = pool.acquire().await?;
    let user = User::create(&mut conn, &email.to_lowercase(), name, password, Role::Admin).await?;
    println!("admin account created: {}", user.email);
    Ok(())
}
