use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use libris_app::view::{ConsoleView, OutputFormat};
use libris_app::{Book, Library, LibraryView, Member};
use libris_kernel::settings::{Settings, StoreSettings};

const ALL_FIELDS_REQUIRED: &str = "All fields must be filled";

/// Manage the books and members of a library.
#[derive(Parser, Debug)]
#[command(name = "libris", version, about)]
struct Cli {
    /// Document store host (overrides configuration)
    #[arg(long, global = true)]
    mongo_host: Option<String>,

    /// Document store port (overrides configuration)
    #[arg(long, global = true)]
    mongo_port: Option<u16>,

    /// Database name (overrides configuration)
    #[arg(long, global = true)]
    db_name: Option<String>,

    /// Book collection name (overrides configuration)
    #[arg(long, global = true)]
    db_book_collection: Option<String>,

    /// Member collection name (overrides configuration)
    #[arg(long, global = true)]
    db_member_collection: Option<String>,

    #[arg(long, value_enum, default_value_t = Format::Text, global = true)]
    format: Format,

    /// Log at info level instead of warnings only
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    fn apply(&self, store: &mut StoreSettings) {
        if let Some(host) = &self.mongo_host {
            store.host = host.clone();
        }
        if let Some(port) = self.mongo_port {
            store.port = port;
        }
        if let Some(name) = &self.db_name {
            store.database = name.clone();
        }
        if let Some(name) = &self.db_book_collection {
            store.book_collection = name.clone();
        }
        if let Some(name) = &self.db_member_collection {
            store.member_collection = name.clone();
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show every book and member (the default)
    Overview,
    #[command(subcommand)]
    Books(BookCommand),
    #[command(subcommand)]
    Members(MemberCommand),
}

#[derive(Subcommand, Debug)]
enum BookCommand {
    /// List all books
    List,
    /// Look a book up by id
    Show {
        #[arg(long, allow_negative_numbers = true)]
        id: i32,
    },
    /// Add a new book
    Add(BookArgs),
    /// Replace the book with the given id
    Update(BookArgs),
    /// Delete the book with the given serial number
    Delete {
        #[arg(long)]
        serial: String,
    },
    /// Find a book by serial number
    Search {
        #[arg(long)]
        serial: String,
    },
}

#[derive(Args, Debug)]
struct BookArgs {
    #[arg(long, allow_negative_numbers = true)]
    id: i32,
    #[arg(long)]
    serial: String,
    #[arg(long)]
    name: String,
    #[arg(long)]
    author: String,
    #[arg(long)]
    genre: String,
}

impl BookArgs {
    fn to_book(&self) -> Book {
        Book::new(self.id, &self.serial, &self.name, &self.author, &self.genre)
    }
}

#[derive(Subcommand, Debug)]
enum MemberCommand {
    /// List all members with their borrowed book
    List,
    /// Add a new member, optionally borrowing a book right away
    Add {
        #[arg(long, allow_negative_numbers = true)]
        id: i32,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, allow_negative_numbers = true)]
        book_id: Option<i32>,
    },
    /// Delete the member with the given id
    Delete {
        #[arg(long, allow_negative_numbers = true)]
        id: i32,
    },
    /// Find a member by id
    Search {
        #[arg(long, allow_negative_numbers = true)]
        id: i32,
    },
    /// Lend a book to a member
    Borrow {
        #[arg(long, allow_negative_numbers = true)]
        member_id: i32,
        #[arg(long, allow_negative_numbers = true)]
        book_id: i32,
    },
}

/// Reference to a stored book by id; controllers reload the rest.
fn book_ref(id: i32) -> Book {
    Book::new(id, "", "", "", "")
}

fn member_ref(id: i32) -> Member {
    Member::new(id, "", "", None)
}

/// Form-level checks done before any store access.
fn precheck(command: &Command, view: &ConsoleView) -> bool {
    match command {
        Command::Books(BookCommand::Add(args) | BookCommand::Update(args)) => {
            let missing = args.to_book().missing_fields();
            if !missing.is_empty() {
                tracing::debug!(?missing, "book form incomplete");
                view.show_book_error(ALL_FIELDS_REQUIRED, None);
                return false;
            }
        }
        Command::Books(BookCommand::Search { serial }) if serial.trim().is_empty() => {
            view.show_book_error("Please enter a serial number", None);
            return false;
        }
        Command::Members(MemberCommand::Add {
            id, name, email, ..
        }) => {
            let missing = Member::new(*id, name, email, None).missing_fields();
            if !missing.is_empty() {
                tracing::debug!(?missing, "member form incomplete");
                view.show_member_error(ALL_FIELDS_REQUIRED, None);
                return false;
            }
        }
        _ => {}
    }
    true
}

async fn run(library: &Library, view: &ConsoleView, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Overview => library.startup().await?,
        Command::Books(command) => match command {
            BookCommand::List => {
                library.books.all_books().await?;
            }
            BookCommand::Show { id } => match library.books.find_by_id(id).await? {
                Some(book) => view.show_searched_book(&book),
                None => view.show_book_not_found(&format!("No existing book with ID {}", id), None),
            },
            BookCommand::Add(args) => library.books.new_book(&args.to_book()).await?,
            BookCommand::Update(args) => library.books.update_book(&args.to_book()).await?,
            BookCommand::Delete { serial } => {
                library
                    .books
                    .delete_book(&Book::new(0, serial, "", "", ""))
                    .await?
            }
            BookCommand::Search { serial } => library.books.search_book(&serial).await?,
        },
        Command::Members(command) => match command {
            MemberCommand::List => {
                library.members.all_members().await?;
            }
            MemberCommand::Add {
                id,
                name,
                email,
                book_id,
            } => {
                library
                    .members
                    .new_member(&Member::new(id, name, email, None))
                    .await?;
                // A rejected add must not lend the book to whoever already holds the id.
                if view.has_failed() {
                    return Ok(());
                }
                if let Some(book_id) = book_id {
                    if let Some(saved) = library.members.find_by_id(id).await? {
                        library
                            .members
                            .borrow_book(Some(&saved), Some(&book_ref(book_id)))
                            .await?;
                    }
                }
            }
            MemberCommand::Delete { id } => library.members.delete_member(&member_ref(id)).await?,
            MemberCommand::Search { id } => library.members.search_member(id).await?,
            MemberCommand::Borrow { member_id, book_id } => {
                library
                    .members
                    .borrow_book(Some(&member_ref(member_id)), Some(&book_ref(book_id)))
                    .await?
            }
        },
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut settings = Settings::load().with_context(|| "failed to load Libris settings")?;
    if !cli.verbose {
        settings.telemetry.filter = "warn".to_string();
    }
    libris_telemetry::init(&settings.telemetry)?;
    cli.apply(&mut settings.store);

    let view = Arc::new(ConsoleView::new(cli.format.into()));
    let command = cli.command.unwrap_or(Command::Overview);
    if !precheck(&command, &view) {
        return Ok(ExitCode::FAILURE);
    }

    tracing::info!(store = %settings.store.uri(), ?command, "running command");
    let library = Library::connect(&settings.store, view.clone())
        .await
        .with_context(|| format!("failed to connect to {}", settings.store.uri()))?;

    let outcome = run(&library, &view, command).await;
    library.close().await;
    outcome?;

    Ok(if view.has_failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
