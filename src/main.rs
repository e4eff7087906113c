use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use storefront_cart::core::ConfigProvider;
use storefront_cart::utils::error::ErrorSeverity;
use storefront_cart::utils::{logger, validation::Validate};
use storefront_cart::{
    CliConfig, ConsolePresenter, LocalStorage, Result, SearchApiSource, Shop, ShopSettings,
    TomlConfig,
};

type ConsoleShop = Shop<LocalStorage, ConsolePresenter>;

#[derive(Parser)]
#[command(name = "storefront-cart")]
#[command(about = "Shopping cart for a product search catalog")]
struct Cli {
    #[command(flatten)]
    settings: CliConfig,

    /// TOML configuration file; replaces the source and storage flags
    #[arg(short, long)]
    config: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Answer yes to every confirmation
    #[arg(short = 'y', long)]
    yes: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
enum Command {
    /// List the catalog with current stock
    Products,
    /// Put one unit of a product in the cart
    Add { product_id: String },
    /// Set the quantity of a product already in the cart (0 removes it)
    Set { product_id: String, quantity: u32 },
    /// Remove a product from the cart
    Remove { product_id: String },
    /// Show the cart contents and total
    Cart,
    /// Empty the cart, returning its units to stock
    Clear,
    /// Buy everything in the cart
    Checkout,
    /// Keep one session open and read commands from stdin
    Shell,
}

#[derive(Parser)]
#[command(name = ">", no_binary_name = true)]
struct ShellLine {
    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::info!("Starting storefront-cart");

    let result = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path);
            match TomlConfig::from_file(path) {
                Ok(config) => run(&config, &cli).await,
                Err(e) => Err(e),
            }
        }
        None => run(&cli.settings, &cli).await,
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {} (Severity: {:?})", e, e.severity());
        tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run<C: ConfigProvider + Validate>(config: &C, cli: &Cli) -> Result<()> {
    config.validate()?;

    let source = SearchApiSource::from_config(config)?;
    let storage = LocalStorage::new(config.storage_path().to_string());
    let settings = ShopSettings {
        cart_key: config.cart_key().to_string(),
        reconcile_policy: config.reconcile_policy(),
    };

    let mut shop = Shop::start(&source, storage, ConsolePresenter::new(cli.yes), &settings).await?;

    match &cli.command {
        Command::Shell => run_shell(&mut shop),
        command => execute(&mut shop, command),
    }
}

fn execute(shop: &mut ConsoleShop, command: &Command) -> Result<()> {
    match command {
        Command::Products => {
            shop.presenter_mut().set_show_catalog(true);
            shop.show_catalog();
            shop.presenter_mut().set_show_catalog(false);
        }
        Command::Add { product_id } => {
            shop.add_to_cart(product_id)?;
        }
        Command::Set {
            product_id,
            quantity,
        } => {
            shop.change_quantity(product_id, *quantity)?;
        }
        Command::Remove { product_id } => {
            if !shop.remove_from_cart(product_id)? {
                println!("{} is not in the cart", product_id);
            }
        }
        Command::Cart => shop.show_cart(),
        Command::Clear => {
            shop.clear_cart()?;
        }
        Command::Checkout => {
            shop.checkout()?;
        }
        Command::Shell => println!("Already in a shell session"),
    }
    Ok(())
}

fn run_shell(shop: &mut ConsoleShop) -> Result<()> {
    println!("Type a command (products, add, set, remove, cart, clear, checkout) or 'exit'.");
    let stdin = std::io::stdin();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let words: Vec<&str> = line.split_whitespace().collect();
        match words.first() {
            None => continue,
            Some(&"exit") | Some(&"quit") => break,
            Some(_) => {}
        }

        match ShellLine::try_parse_from(words) {
            Ok(parsed) => execute(shop, &parsed.command)?,
            Err(e) => println!("{}", e),
        }
    }

    Ok(())
}
