use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use crate::application::{parse_wallet_id, validate_amount};
use crate::config::{DatabaseArgs, ServerArgs};
use crate::domain::{format_cents, Wallet};
use crate::http::{build_router, run_server};
use crate::storage::{PgWalletRepository, PgWalletService};
use crate::telemetry::{init_tracing, DEFAULT_LOG_LEVEL};

/// walletd - Wallet balance ledger
#[derive(Parser)]
#[command(name = "walletd")]
#[command(about = "Concurrent wallet balances with an audited operation log, on PostgreSQL")]
#[command(version)]
pub struct Cli {
    /// Log level: error, warn, info, debug, trace (RUST_LOG overrides)
    #[arg(long, env = "LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL, global = true)]
    pub log_level: String,

    #[command(flatten)]
    pub database: DatabaseArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply migrations and start the HTTP server
    Serve {
        #[command(flatten)]
        server: ServerArgs,
    },

    /// Create or update the database schema
    Migrate,

    /// Wallet provisioning commands
    #[command(subcommand)]
    Wallet(WalletCommands),

    /// Show the current balance of a wallet
    Balance {
        /// Wallet ID
        wallet_id: String,
    },

    /// Credit a wallet
    Deposit {
        /// Wallet ID
        wallet_id: String,

        /// Amount in the smallest currency unit (e.g. 500 = 5.00)
        #[arg(allow_hyphen_values = true)]
        amount: i64,
    },

    /// Debit a wallet
    Withdraw {
        /// Wallet ID
        wallet_id: String,

        /// Amount in the smallest currency unit (e.g. 500 = 5.00)
        #[arg(allow_hyphen_values = true)]
        amount: i64,
    },

    /// List recorded operations for a wallet, newest first
    Operations {
        /// Wallet ID
        wallet_id: String,

        /// Maximum number of operations to show
        #[arg(short, long, default_value_t = 20)]
        limit: i64,
    },
}

#[derive(Subcommand)]
pub enum WalletCommands {
    /// Create a new wallet and print its ID
    Create {
        /// Opening balance in the smallest currency unit
        #[arg(short, long, default_value_t = 0)]
        balance: i64,
    },

    /// Show wallet details
    Show {
        /// Wallet ID
        wallet_id: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        init_tracing(&self.log_level)?;

        let url = &self.database.database_url;
        let settings = self.database.pool_settings();

        match self.command {
            Commands::Serve { server } => {
                let repo = PgWalletRepository::init(url, &settings).await?;
                let service = Arc::new(PgWalletService::from_repository(repo));
                run_server(build_router(service), server.bind_addr)
                    .await
                    .context("HTTP server failed")?;
            }

            Commands::Migrate => {
                let repo = PgWalletRepository::connect(url, &settings).await?;
                repo.migrate().await?;
                println!("Database migrated");
            }

            Commands::Wallet(wallet_cmd) => {
                let repo = PgWalletRepository::connect(url, &settings).await?;
                run_wallet_command(&repo, wallet_cmd).await?;
            }

            Commands::Balance { wallet_id } => {
                let wallet_id = parse_wallet_id(&wallet_id)?;
                let service = connect_service(url, &settings).await?;
                let balance = service.balance(wallet_id).await?;
                println!("{}: {} ({})", wallet_id, balance, format_cents(balance));
            }

            Commands::Deposit { wallet_id, amount } => {
                let amount = validate_amount(amount)?;
                let wallet_id = parse_wallet_id(&wallet_id)?;
                let service = connect_service(url, &settings).await?;
                service.deposit(wallet_id, amount).await?;
                let balance = service.balance(wallet_id).await?;
                println!("Deposited {} into {} (balance: {})", amount, wallet_id, balance);
            }

            Commands::Withdraw { wallet_id, amount } => {
                let amount = validate_amount(amount)?;
                let wallet_id = parse_wallet_id(&wallet_id)?;
                let service = connect_service(url, &settings).await?;
                service.withdraw(wallet_id, amount).await?;
                let balance = service.balance(wallet_id).await?;
                println!("Withdrew {} from {} (balance: {})", amount, wallet_id, balance);
            }

            Commands::Operations { wallet_id, limit } => {
                if limit <= 0 {
                    bail!("Limit must be positive");
                }
                let wallet_id = parse_wallet_id(&wallet_id)?;
                let repo = PgWalletRepository::connect(url, &settings).await?;
                let operations = repo.list_operations(wallet_id, limit).await?;

                if operations.is_empty() {
                    println!("No operations found.");
                } else {
                    println!("{:<36} {:<9} {:>14}  {}", "ID", "TYPE", "AMOUNT", "RECORDED");
                    println!("{}", "-".repeat(84));
                    for op in operations {
                        println!(
                            "{:<36} {:<9} {:>14}  {}",
                            op.id,
                            op.operation_type,
                            op.amount,
                            op.created_at.format("%Y-%m-%d %H:%M:%S")
                        );
                    }
                }
            }
        }

        Ok(())
    }
}

async fn connect_service(
    url: &str,
    settings: &crate::storage::PoolSettings,
) -> Result<PgWalletService> {
    let repo = PgWalletRepository::connect(url, settings).await?;
    Ok(PgWalletService::from_repository(repo))
}

async fn run_wallet_command(repo: &PgWalletRepository, cmd: WalletCommands) -> Result<()> {
    match cmd {
        WalletCommands::Create { balance } => {
            if balance < 0 {
                bail!("Opening balance cannot be negative");
            }
            let wallet = Wallet::new(balance);
            repo.create_wallet(&wallet).await?;
            println!("{}", wallet.id);
        }

        WalletCommands::Show { wallet_id } => {
            let wallet_id = parse_wallet_id(&wallet_id)?;
            let wallet = repo
                .get_wallet(wallet_id)
                .await?
                .with_context(|| format!("Wallet not found: {}", wallet_id))?;

            println!("Wallet: {}", wallet.id);
            println!("  Balance:  {} ({})", wallet.balance, format_cents(wallet.balance));
            println!("  Created:  {}", wallet.created_at.format("%Y-%m-%d %H:%M:%S"));
            println!("  Updated:  {}", wallet.updated_at.format("%Y-%m-%d %H:%M:%S"));
        }
    }
    Ok(())
}
