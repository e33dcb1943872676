//! Command-line arguments

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use shared::{Decimal, PaymentMethod, PeriodPreset, Role};

#[derive(Debug, Parser)]
#[command(name = "belle", version, about = "Belle Biju sales dashboard client")]
pub struct Cli {
    /// API base URL
    #[arg(long, env = "BELLE_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "BELLE_TIMEOUT_SECS", global = true)]
    pub timeout: Option<u64>,

    /// Session file (token + user)
    #[arg(long, env = "BELLE_SESSION_FILE", global = true)]
    pub session_file: Option<PathBuf>,

    /// Also write logs to daily files in this directory
    #[arg(long, env = "BELLE_LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and persist the session
    Login {
        #[arg(short, long)]
        username: String,
        /// Read from BELLE_PASSWORD or prompted when omitted
        #[arg(short, long, env = "BELLE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Clear the persisted session
    Logout,
    /// Show the signed-in user after validating the token
    Whoami,
    /// Sales (`/vendas`)
    #[command(subcommand)]
    Sales(SalesCommand),
    /// Users (`/users`)
    #[command(subcommand)]
    Users(UsersCommand),
    /// Products (`/produto`)
    #[command(subcommand)]
    Products(ProductsCommand),
    /// Payment-method charts for a period
    Charts(ChartsArgs),
}

#[derive(Debug, Subcommand)]
pub enum SalesCommand {
    /// List sales with totals
    List {
        /// Only this payment method (DINHEIRO, PIX, DEBITO, CREDITO)
        #[arg(long)]
        pagamento: Option<PaymentMethod>,
        /// Product name contains
        #[arg(long)]
        produto: Option<String>,
    },
    /// Register a sale
    Add(SaleArgs),
    /// Edit a sale; omitted fields keep their value
    Update {
        id: String,
        #[arg(long)]
        produto: Option<String>,
        #[arg(long)]
        preco: Option<Decimal>,
        #[arg(long)]
        quantidade: Option<i32>,
        #[arg(long)]
        pagamento: Option<PaymentMethod>,
    },
    /// Delete a sale
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Sales between two dates (YYYY-MM-DD)
    Period { inicio: String, fim: String },
}

#[derive(Debug, Args)]
pub struct SaleArgs {
    #[arg(long)]
    pub produto: String,
    #[arg(long)]
    pub preco: Decimal,
    #[arg(long, default_value_t = 1)]
    pub quantidade: i32,
    #[arg(long)]
    pub pagamento: PaymentMethod,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List users, optionally filtered
    List {
        #[arg(long)]
        nome: Option<String>,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        role: Option<Role>,
    },
    /// Register a user
    Add {
        #[arg(long)]
        nome: String,
        #[arg(long)]
        username: String,
        #[arg(long, env = "BELLE_NEW_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long, default_value = "USER")]
        role: Role,
    },
    /// Edit a user; omitted fields are not sent
    Update {
        id: String,
        #[arg(long)]
        nome: Option<String>,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        role: Option<Role>,
    },
    /// Delete a user
    Delete {
        id: String,
        #[arg(short, long)]
        yes: bool,
    },
    /// Check whether a username is free
    Check {
        username: String,
        /// Ignore this user id (when renaming)
        #[arg(long)]
        exclude: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProductsCommand {
    /// List products, optionally by name
    List {
        #[arg(long)]
        search: Option<String>,
    },
    /// Register a product
    Add(ProductArgs),
    /// Replace a product's fields
    Update {
        id: String,
        #[command(flatten)]
        product: ProductArgs,
    },
    /// Delete a product
    Delete {
        id: String,
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Debug, Args)]
pub struct ProductArgs {
    #[arg(long)]
    pub nome: String,
    #[arg(long)]
    pub preco: Decimal,
    #[arg(long, default_value_t = 0)]
    pub quantidade: i32,
    #[arg(long)]
    pub descricao: Option<String>,
}

#[derive(Debug, Args)]
pub struct ChartsArgs {
    /// hoje, semana, mes or trimestre
    #[arg(long, conflicts_with_all = ["inicio", "fim"])]
    pub periodo: Option<PeriodPreset>,
    /// Custom start date (YYYY-MM-DD)
    #[arg(long, requires = "fim")]
    pub inicio: Option<String>,
    /// Custom end date (YYYY-MM-DD)
    #[arg(long, requires = "inicio")]
    pub fim: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_sale_add() {
        let cli = Cli::parse_from([
            "belle", "sales", "add", "--produto", "Colar", "--preco", "19.99", "--quantidade",
            "3", "--pagamento", "pix",
        ]);
        let Command::Sales(SalesCommand::Add(args)) = cli.command else {
            panic!("unexpected command");
        };
        assert_eq!(args.preco, Decimal::new(1999, 2));
        assert_eq!(args.pagamento, PaymentMethod::Pix);
    }

    #[test]
    fn test_charts_custom_needs_both_dates() {
        assert!(Cli::try_parse_from(["belle", "charts", "--inicio", "2024-01-01"]).is_err());
        let cli = Cli::try_parse_from(["belle", "charts", "--periodo", "semana"]).unwrap();
        let Command::Charts(args) = cli.command else {
            panic!("unexpected command");
        };
        assert_eq!(args.periodo, Some(PeriodPreset::Semana));
    }
}
