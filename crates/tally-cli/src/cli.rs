use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tally",
    about = "Tally — command-line client for the remote bookkeeping service",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Path to the config file (defaults to ~/.config/tally/config.toml).
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

#[derive(Subcommand)]
pub enum Command {
    /// List and inspect books
    Book(BookArgs),
    /// Manage accounts within a book
    Account(AccountArgs),
    /// Manage account groups within a book
    Group(GroupArgs),
    /// Manage transactions: list, create, lifecycle, merge
    Tx(TxArgs),
    /// Query balances
    Balance(BalanceArgs),
    /// List and inspect collections
    Collection(CollectionArgs),
    /// Scaffold, build, and deploy platform apps
    App(AppArgs),
    /// Get or set configuration
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct BookArgs {
    #[command(subcommand)]
    pub action: BookAction,
}

#[derive(Subcommand)]
pub enum BookAction {
    List,
    Get { book_id: String },
    Update {
        book_id: String,
        #[arg(long)]
        name: Option<String>,
    },
}

#[derive(Args)]
pub struct AccountArgs {
    /// Book the accounts belong to (falls back to the configured default).
    #[arg(short, long)]
    pub book: Option<String>,
    #[command(subcommand)]
    pub action: AccountAction,
}

#[derive(Subcommand)]
pub enum AccountAction {
    List,
    Get { account_id: String },
    Create {
        name: String,
        #[arg(long, default_value = "ASSET")]
        kind: String,
    },
    Update {
        account_id: String,
        #[arg(long)]
        name: Option<String>,
    },
    Delete { account_id: String },
}

#[derive(Args)]
pub struct GroupArgs {
    #[arg(short, long)]
    pub book: Option<String>,
    #[command(subcommand)]
    pub action: GroupAction,
}

#[derive(Subcommand)]
pub enum GroupAction {
    List,
    Get { group_id: String },
    Create {
        name: String,
        #[arg(long)]
        parent: Option<String>,
    },
    Update {
        group_id: String,
        #[arg(long)]
        name: Option<String>,
    },
    Delete { group_id: String },
}

#[derive(Args)]
pub struct TxArgs {
    #[arg(short, long)]
    pub book: Option<String>,
    #[command(subcommand)]
    pub action: TxAction,
}

#[derive(Subcommand)]
pub enum TxAction {
    /// List transactions, optionally filtered by a remote query
    List {
        #[arg(short, long)]
        query: Option<String>,
    },
    Get { transaction_id: String },
    Create {
        #[arg(long)]
        date: String,
        #[arg(long)]
        amount: String,
        #[arg(short, long, default_value = "")]
        description: String,
        /// Credit account id
        #[arg(long)]
        credit: Option<String>,
        /// Debit account id
        #[arg(long)]
        debit: Option<String>,
    },
    /// Update fields of an existing transaction
    Update {
        transaction_id: String,
        #[arg(long)]
        date: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        /// Url to add to the transaction's url set
        #[arg(long)]
        add_url: Vec<String>,
        /// Property to set, as key=value
        #[arg(long)]
        set_prop: Vec<String>,
    },
    /// Soft-delete a transaction (reversible with restore)
    Trash { transaction_id: String },
    Restore { transaction_id: String },
    Post { transaction_id: String },
    Check { transaction_id: String },
    Uncheck { transaction_id: String },
    /// Collapse two duplicate transactions into one.
    ///
    /// The first id survives and receives reconciled urls, attachments,
    /// properties, and account references; the second is trashed. Refused
    /// when the amounts differ.
    Merge {
        transaction_id_a: String,
        transaction_id_b: String,
    },
}

#[derive(Args)]
pub struct BalanceArgs {
    #[arg(short, long)]
    pub book: Option<String>,
    /// Remote balance query, e.g. "group:'Assets' after:2024-01"
    pub query: String,
}

#[derive(Args)]
pub struct CollectionArgs {
    #[command(subcommand)]
    pub action: CollectionAction,
}

#[derive(Subcommand)]
pub enum CollectionAction {
    List,
    Get { collection_id: String },
}

#[derive(Args)]
pub struct AppArgs {
    #[command(subcommand)]
    pub action: AppAction,
}

#[derive(Subcommand)]
pub enum AppAction {
    /// Scaffold a new app directory
    Init { name: String },
    /// Bundle an app directory into app-bundle.json
    Build {
        #[arg(default_value = ".")]
        dir: String,
    },
    /// Bundle and upload an app
    Deploy {
        #[arg(default_value = ".")]
        dir: String,
    },
    /// List apps installed on a book
    List {
        #[arg(short, long)]
        book: Option<String>,
    },
}

#[derive(Args)]
pub struct ConfigArgs {
    pub key: Option<String>,
    pub value: Option<String>,
}
