use anyhow::Context;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use kxl_config::Config;
use kxl_db::{PgPrincipalRepository, PgRolePermissionRepository, init_db_pool};

#[derive(Parser)]
#[command(name = "kxl-cli")]
#[command(about = "KXL CLI - Administrative tools for the KXL API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an admin account
    CreateAdmin {
        /// Login name
        #[arg(short = 'u', long)]
        username: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,

        /// Role code
        #[arg(short = 'r', long, default_value = "super_admin")]
        role: String,
    },
    /// Apply pending database migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env().context("Invalid configuration")?;
    let pool = init_db_pool(&config.database)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::CreateAdmin {
            username,
            password,
            role,
        } => {
            let username = match username {
                Some(username) => username,
                None => Input::new()
                    .with_prompt("Username")
                    .interact_text()
                    .context("Failed to read username")?,
            };
            let password = match password {
                Some(password) => password,
                None => Password::new()
                    .with_prompt("Password")
                    .with_confirmation("Confirm password", "Passwords don't match")
                    .interact()
                    .context("Failed to read password")?,
            };

            let principals = PgPrincipalRepository::new(pool.clone());
            let roles = PgRolePermissionRepository::new(pool);
            let admin = kxl_cli::create_admin(
                &principals,
                &roles,
                &username,
                &password,
                &role,
                config.security.password_hash_cost,
            )
            .await?;

            println!("Admin created");
            println!("   Id: {}", admin.id);
            println!("   Username: {}", admin.username);
            println!("   Role: {}", admin.role);
        }
        Commands::Migrate => {
            kxl_db::MIGRATOR
                .run(&pool)
                .await
                .context("Failed to run migrations")?;
            println!("Migrations applied");
        }
    }

    Ok(())
}
