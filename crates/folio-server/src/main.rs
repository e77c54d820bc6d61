//! Folio Server - Main entry point

use anyhow::Result;
use clap::{Parser, Subcommand};
use folio_common::logging::{init_logging, LogConfig};
use folio_common::types::{GroupName, Role};
use sqlx::SqlitePool;
use tracing::{error, info};

use folio_server::config::Config;
use folio_server::cqrs::{build_mediator, send_query};
use folio_server::features::libraries::queries::{
    BooksByAuthorQuery, LibrarianForLibraryQuery, LibraryBooksQuery,
};
use folio_server::features::libraries::types::LibraryBook;
use folio_server::seed::{self, NewUser};
use folio_server::{api, db};

/// Folio - library catalog and blog server
#[derive(Parser, Debug)]
#[command(name = "folio-server")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute (defaults to `serve`)
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server
    Serve,

    /// Apply pending database migrations
    Migrate,

    /// Create the Viewers, Editors and Admins groups with their permissions
    SetupGroups,

    /// Create a user account
    CreateUser {
        /// Login name
        username: String,

        /// Email address
        #[arg(long)]
        email: String,

        /// Password (read from the environment when omitted)
        #[arg(long, env = "FOLIO_USER_PASSWORD", hide_env_values = true)]
        password: String,

        /// Role: Admin, Librarian or Member
        #[arg(long, default_value = "Member")]
        role: Role,

        /// Grant superuser and staff flags
        #[arg(long)]
        superuser: bool,

        /// Groups to join (comma separated)
        #[arg(long, value_delimiter = ',')]
        groups: Vec<GroupName>,
    },

    /// Insert sample authors, books, libraries and librarians
    SeedSampleData,

    /// Run a catalog query
    Query {
        #[command(subcommand)]
        command: QueryCommand,
    },
}

#[derive(Subcommand, Debug)]
enum QueryCommand {
    /// Books written by an author
    BooksByAuthor {
        /// Author name
        author: String,
    },

    /// Books held by a library
    LibraryBooks {
        /// Library name
        library: String,
    },

    /// The librarian of a library
    Librarian {
        /// Library name
        library: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_config = LogConfig::builder()
        .log_file_prefix("folio-server".to_string())
        .filter_directives("folio_server=debug,tower_http=debug,sqlx=warn".to_string())
        .build();

    // Environment variables take precedence
    let log_config = log_config.clone().merge_env().unwrap_or(log_config);

    let _guard = match init_logging(&log_config) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {e}");
            None
        },
    };

    if let Err(e) = execute_command(cli.command.unwrap_or(Commands::Serve)).await {
        error!(error = %e, "Command failed");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn execute_command(command: Commands) -> Result<()> {
    let config = Config::load()?;

    match command {
        Commands::Serve => {
            info!(
                "Starting Folio Server on {}:{}",
                config.server.host, config.server.port
            );
            api::serve(config).await?;
        },

        Commands::Migrate => {
            open_database(&config).await?;
            println!("Migrations applied to {}", config.database.url);
        },

        Commands::SetupGroups => {
            let pool = open_database(&config).await?;
            let created = seed::setup_groups(&pool).await?;
            for group in GroupName::ALL {
                let status = if created.contains(&group) { "created" } else { "updated" };
                println!("{group}: {status} ({} permissions)", group.grants().len());
            }
        },

        Commands::CreateUser {
            username,
            email,
            password,
            role,
            superuser,
            groups,
        } => {
            let pool = open_database(&config).await?;
            let id = seed::create_user(
                &pool,
                NewUser {
                    username: username.clone(),
                    email,
                    password,
                    role,
                    superuser,
                    groups,
                },
            )
            .await?;
            println!("Created user '{username}' (id {id})");
        },

        Commands::SeedSampleData => {
            let pool = open_database(&config).await?;
            let report = seed::create_sample_data(&pool).await?;
            println!(
                "Sample data created: {} books, {} libraries, {} librarians",
                report.books, report.libraries, report.librarians
            );
        },

        Commands::Query { command } => {
            let mut mediator = build_mediator(open_database(&config).await?);
            match command {
                QueryCommand::BooksByAuthor { author } => {
                    let books = send_query(&mut mediator, BooksByAuthorQuery { author }).await?;
                    print_books(&books);
                },
                QueryCommand::LibraryBooks { library } => {
                    let books = send_query(&mut mediator, LibraryBooksQuery { library }).await?;
                    print_books(&books);
                },
                QueryCommand::Librarian { library } => {
                    let librarian = send_query(&mut mediator, LibrarianForLibraryQuery { library }).await?;
                    match librarian {
                        Some(librarian) => println!("{}", librarian.name),
                        None => println!("None"),
                    }
                },
            }
        },
    }

    Ok(())
}

async fn open_database(config: &Config) -> Result<SqlitePool> {
    let pool = db::create_pool(&config.database).await?;
    db::run_migrations(&pool).await?;
    Ok(pool)
}

fn print_books(books: &[LibraryBook]) {
    if books.is_empty() {
        println!("No books found");
    }
    for book in books {
        println!("{} ({}) by {}", book.title, book.publication_year, book.author);
    }
}
