use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use tally_api::{HttpLedgerService, LedgerService};
use tally_app::{build_bundle, scaffold_app};
use tally_merge::MergeEngine;
use tally_types::{parse_amount, Account, AccountType, Group, Transaction};

use crate::cli::*;
use crate::config::Config;
use crate::output;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config_path = Config::resolve_path(cli.config.as_deref());
    let config = Config::load(&config_path)?;

    match cli.command {
        Command::Config(args) => cmd_config(args, config, &config_path),
        command => {
            let service: Arc<dyn LedgerService> = Arc::new(HttpLedgerService::with_timeout(
                &config.base_url,
                &config.api_key,
                config.timeout_secs,
            )?);
            dispatch(command, service, &config, &cli.format).await
        }
    }
}

async fn dispatch(
    command: Command,
    service: Arc<dyn LedgerService>,
    config: &Config,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    match command {
        Command::Book(args) => cmd_book(args, service.as_ref(), format).await,
        Command::Account(args) => cmd_account(args, service.as_ref(), config, format).await,
        Command::Group(args) => cmd_group(args, service.as_ref(), config, format).await,
        Command::Tx(args) => cmd_tx(args, service, config, format).await,
        Command::Balance(args) => {
            let book = resolve_book(args.book, config)?;
            let balances = service.query_balances(&book, &args.query).await?;
            output::print_balances(&balances, format)
        }
        Command::Collection(args) => cmd_collection(args, service.as_ref(), format).await,
        Command::App(args) => cmd_app(args, service.as_ref(), config, format).await,
        Command::Config(_) => unreachable!("handled before dispatch"),
    }
}

fn resolve_book(arg: Option<String>, config: &Config) -> anyhow::Result<String> {
    arg.or_else(|| config.default_book.clone())
        .context("no book specified; pass --book or set default_book in the config")
}

async fn cmd_book(
    args: BookArgs,
    service: &dyn LedgerService,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    match args.action {
        BookAction::List => {
            let books = service.list_books().await?;
            output::print_books(&books, format)
        }
        BookAction::Get { book_id } => {
            let book = service.get_book(&book_id).await?;
            output::print_books(std::slice::from_ref(&book), format)
        }
        BookAction::Update { book_id, name } => {
            let mut book = service.get_book(&book_id).await?;
            if let Some(name) = name {
                book.name = name;
            }
            let updated = service.update_book(&book).await?;
            println!("{} Updated book {}", "✓".green().bold(), updated.name.bold());
            Ok(())
        }
    }
}

async fn cmd_account(
    args: AccountArgs,
    service: &dyn LedgerService,
    config: &Config,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let book = resolve_book(args.book, config)?;
    match args.action {
        AccountAction::List => {
            let accounts = service.list_accounts(&book).await?;
            output::print_accounts(&accounts, format)
        }
        AccountAction::Get { account_id } => {
            let account = service.get_account(&book, &account_id).await?;
            output::print_accounts(std::slice::from_ref(&account), format)
        }
        AccountAction::Create { name, kind } => {
            let account_type = AccountType::parse(&kind)?;
            let account = Account {
                id: String::new(),
                name: name.clone(),
                normalized_name: name.trim().to_lowercase(),
                account_type,
                groups: vec![],
                balance: None,
                archived: false,
            };
            let created = service.create_account(&book, &account).await?;
            println!("{} Created account {} ({})", "✓".green().bold(), created.name.bold(), created.id.yellow());
            Ok(())
        }
        AccountAction::Update { account_id, name } => {
            let mut account = service.get_account(&book, &account_id).await?;
            if let Some(name) = name {
                account.normalized_name = name.trim().to_lowercase();
                account.name = name;
            }
            let updated = service.update_account(&book, &account).await?;
            println!("{} Updated account {}", "✓".green().bold(), updated.name.bold());
            Ok(())
        }
        AccountAction::Delete { account_id } => {
            service.delete_account(&book, &account_id).await?;
            println!("{} Deleted account {}", "✓".green().bold(), account_id.yellow());
            Ok(())
        }
    }
}

async fn cmd_group(
    args: GroupArgs,
    service: &dyn LedgerService,
    config: &Config,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let book = resolve_book(args.book, config)?;
    match args.action {
        GroupAction::List => {
            let groups = service.list_groups(&book).await?;
            output::print_groups(&groups, format)
        }
        GroupAction::Get { group_id } => {
            let group = service.get_group(&book, &group_id).await?;
            output::print_groups(std::slice::from_ref(&group), format)
        }
        GroupAction::Create { name, parent } => {
            let group = Group { id: String::new(), name, parent_id: parent, hidden: false };
            let created = service.create_group(&book, &group).await?;
            println!("{} Created group {} ({})", "✓".green().bold(), created.name.bold(), created.id.yellow());
            Ok(())
        }
        GroupAction::Update { group_id, name } => {
            let mut group = service.get_group(&book, &group_id).await?;
            if let Some(name) = name {
                group.name = name;
            }
            let updated = service.update_group(&book, &group).await?;
            println!("{} Updated group {}", "✓".green().bold(), updated.name.bold());
            Ok(())
        }
        GroupAction::Delete { group_id } => {
            service.delete_group(&book, &group_id).await?;
            println!("{} Deleted group {}", "✓".green().bold(), group_id.yellow());
            Ok(())
        }
    }
}

async fn cmd_tx(
    args: TxArgs,
    service: Arc<dyn LedgerService>,
    config: &Config,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let book = resolve_book(args.book, config)?;
    match args.action {
        TxAction::List { query } => {
            let txs = service.list_transactions(&book, query.as_deref()).await?;
            output::print_transactions(&txs, format)
        }
        TxAction::Get { transaction_id } => {
            let tx = require_transaction(service.as_ref(), &book, &transaction_id).await?;
            output::print_transaction(&tx, format)
        }
        TxAction::Create { date, amount, description, credit, debit } => {
            let amount = parse_amount(&amount)?;
            let tx = Transaction {
                id: String::new(),
                book_id: book.clone(),
                date,
                amount,
                description,
                credit_account: credit.map(|id| account_ref(&id)),
                debit_account: debit.map(|id| account_ref(&id)),
                urls: vec![],
                attachments: vec![],
                properties: Default::default(),
                posted: false,
                checked: false,
                trashed: false,
            };
            let created = service.create_transaction(&book, &tx).await?;
            println!("{} Created transaction {}", "✓".green().bold(), created.id.yellow());
            Ok(())
        }
        TxAction::Update { transaction_id, date, description, add_url, set_prop } => {
            let mut tx = require_transaction(service.as_ref(), &book, &transaction_id).await?;
            if let Some(date) = date {
                tx.date = date;
            }
            if let Some(description) = description {
                tx.description = description;
            }
            for url in add_url {
                if !tx.urls.contains(&url) {
                    tx.urls.push(url);
                }
            }
            for pair in set_prop {
                let (key, value) = pair
                    .split_once('=')
                    .with_context(|| format!("property must be key=value, got: {pair}"))?;
                tx.properties.insert(key.to_string(), value.to_string());
            }
            let updated = service.update_transaction(&tx).await?;
            println!("{} Updated {}", "✓".green().bold(), updated.id.yellow());
            Ok(())
        }
        TxAction::Trash { transaction_id } => {
            let tx = require_transaction(service.as_ref(), &book, &transaction_id).await?;
            service.trash_transaction(&tx).await?;
            println!("{} Trashed {}", "✓".green().bold(), transaction_id.yellow());
            Ok(())
        }
        TxAction::Restore { transaction_id } => {
            let tx = require_transaction(service.as_ref(), &book, &transaction_id).await?;
            service.restore_transaction(&tx).await?;
            println!("{} Restored {}", "✓".green().bold(), transaction_id.yellow());
            Ok(())
        }
        TxAction::Post { transaction_id } => {
            let tx = require_transaction(service.as_ref(), &book, &transaction_id).await?;
            service.post_transaction(&tx).await?;
            println!("{} Posted {}", "✓".green().bold(), transaction_id.yellow());
            Ok(())
        }
        TxAction::Check { transaction_id } => {
            let tx = require_transaction(service.as_ref(), &book, &transaction_id).await?;
            service.check_transaction(&tx).await?;
            println!("{} Checked {}", "✓".green().bold(), transaction_id.yellow());
            Ok(())
        }
        TxAction::Uncheck { transaction_id } => {
            let tx = require_transaction(service.as_ref(), &book, &transaction_id).await?;
            service.uncheck_transaction(&tx).await?;
            println!("{} Unchecked {}", "✓".green().bold(), transaction_id.yellow());
            Ok(())
        }
        TxAction::Merge { transaction_id_a, transaction_id_b } => {
            let engine = MergeEngine::new(service);
            let result = engine.merge(&book, &transaction_id_a, &transaction_id_b).await?;
            output::print_merge_result(&result, format)
        }
    }
}

fn account_ref(id: &str) -> tally_types::AccountRef {
    // Name resolution happens remotely; the id is all the create call needs.
    tally_types::AccountRef::new(id, id)
}

async fn require_transaction(
    service: &dyn LedgerService,
    book: &str,
    transaction_id: &str,
) -> anyhow::Result<Transaction> {
    service
        .lookup_transaction(book, transaction_id)
        .await?
        .with_context(|| format!("transaction not found: {transaction_id}"))
}

async fn cmd_collection(
    args: CollectionArgs,
    service: &dyn LedgerService,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    match args.action {
        CollectionAction::List => {
            let collections = service.list_collections().await?;
            output::print_collections(&collections, format)
        }
        CollectionAction::Get { collection_id } => {
            let collection = service.get_collection(&collection_id).await?;
            output::print_collections(std::slice::from_ref(&collection), format)
        }
    }
}

async fn cmd_app(
    args: AppArgs,
    service: &dyn LedgerService,
    config: &Config,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    match args.action {
        AppAction::Init { name } => {
            let app_dir = scaffold_app(Path::new("."), &name)?;
            println!("{} Scaffolded app in {}", "✓".green().bold(), app_dir.display().to_string().bold());
            Ok(())
        }
        AppAction::Build { dir } => {
            let bundle = build_bundle(Path::new(&dir))?;
            let out = PathBuf::from(&dir).join("app-bundle.json");
            std::fs::write(&out, serde_json::to_string_pretty(&bundle)?)?;
            println!(
                "{} Bundled {} ({} files) → {}",
                "✓".green().bold(),
                bundle.manifest.name.bold(),
                bundle.files.len(),
                out.display()
            );
            Ok(())
        }
        AppAction::Deploy { dir } => {
            let bundle = build_bundle(Path::new(&dir))?;
            let app = service.deploy_app(bundle.to_payload()?).await?;
            println!("{} Deployed {} ({})", "✓".green().bold(), app.name.bold(), app.id.yellow());
            Ok(())
        }
        AppAction::List { book } => {
            let book = resolve_book(book, config)?;
            let apps = service.list_apps(&book).await?;
            output::print_apps(&apps, format)
        }
    }
}

fn cmd_config(args: ConfigArgs, mut config: Config, path: &PathBuf) -> anyhow::Result<()> {
    match (&args.key, &args.value) {
        (Some(key), Some(value)) => {
            config.set(key, value)?;
            config.save(path)?;
            println!("Set {} = {}", key.bold(), value);
        }
        (Some(key), None) => match config.get(key) {
            Some(value) => println!("{} = {}", key.bold(), value),
            None => println!("{} = (not set)", key.bold()),
        },
        _ => {
            println!("config file: {}", path.display().to_string().dimmed());
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }
    Ok(())
}
