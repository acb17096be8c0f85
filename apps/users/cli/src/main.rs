use clap::{Parser, Subcommand};
use core_config::tracing::{init_tracing, install_color_eyre};
use core_repository::SearchInput;
use domain_users::{
    Argon2HashProvider, InMemoryUserRepository, SignInInput, SignUpInput, UpdatePasswordInput,
    UpdateUserInput, UserResult, UserService,
};
use serde::Serialize;
use serde_json::json;
use tracing::info;

mod config;

use config::Config;

type Service = UserService<InMemoryUserRepository, Argon2HashProvider>;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Run the user account use cases against an in-memory store"
)]
struct Args {
    /// Number of generated users to sign up before running the command
    #[arg(long, default_value_t = 0)]
    seed: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List users. Values are passed through as-is and normalized by the search engine.
    Search {
        #[arg(long)]
        page: Option<String>,
        #[arg(long)]
        per_page: Option<String>,
        /// Field to sort by (name, createdAt)
        #[arg(long)]
        sort: Option<String>,
        /// asc or desc (default)
        #[arg(long)]
        sort_direction: Option<String>,
        /// Case-insensitive match on the user name
        #[arg(long)]
        filter: Option<String>,
    },
    /// Walk through every use case once and print each outcome
    Demo,
}

impl Command {
    fn search_input(
        page: Option<String>,
        per_page: Option<String>,
        sort: Option<String>,
        sort_direction: Option<String>,
        filter: Option<String>,
    ) -> SearchInput {
        SearchInput {
            page: page.map(Into::into),
            per_page: per_page.map(Into::into),
            sort: sort.map(Into::into),
            sort_direction: sort_direction.map(Into::into),
            filter: filter.map(Into::into),
        }
    }
}

/// Print a use case outcome as JSON, rendering failures the same way
fn render<T: Serialize>(step: &str, result: UserResult<T>) -> eyre::Result<()> {
    let body = match result {
        Ok(value) => json!({ "step": step, "result": value }),
        Err(e) => json!({
            "step": step,
            "error": {
                "type": e.error_type(),
                "message": e.to_string()
            }
        }),
    };
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

async fn seed(service: &Service, count: usize) -> eyre::Result<()> {
    for i in 1..=count {
        service
            .sign_up(SignUpInput {
                name: format!("user-{:03}", i),
                email: format!("user{:03}@example.com", i),
                password: format!("password-{}", i),
            })
            .await?;
    }
    if count > 0 {
        info!(count, "Seeded users");
    }
    Ok(())
}

async fn demo(service: &Service) -> eyre::Result<()> {
    let sign_up = SignUpInput {
        name: "Jane Doe".to_string(),
        email: "jane@example.com".to_string(),
        password: "Secret123".to_string(),
    };

    let jane = service.sign_up(sign_up.clone()).await?;
    render("sign-up", Ok(&jane))?;
    render("sign-up (same email)", service.sign_up(sign_up).await)?;

    render(
        "sign-in",
        service
            .sign_in(SignInInput {
                email: "jane@example.com".to_string(),
                password: "Secret123".to_string(),
            })
            .await,
    )?;
    render(
        "sign-in (wrong password)",
        service
            .sign_in(SignInInput {
                email: "jane@example.com".to_string(),
                password: "wrong".to_string(),
            })
            .await,
    )?;

    render(
        "update profile",
        service
            .update_user(UpdateUserInput {
                id: jane.id.clone(),
                name: "Jane Smith".to_string(),
            })
            .await,
    )?;
    render(
        "update password",
        service
            .update_password(UpdatePasswordInput {
                id: jane.id.clone(),
                password: "NewSecret456".to_string(),
                old_password: "Secret123".to_string(),
            })
            .await,
    )?;

    render(
        "list",
        service
            .list_users(SearchInput::default().sort("name").sort_direction("asc"))
            .await,
    )?;

    render("delete", service.delete_user(&jane.id).await)?;
    render("get (deleted)", service.get_user(&jane.id).await)?;
    Ok(())
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let args = Args::parse();
    let config = Config::from_env()?;

    init_tracing(&config.environment);

    // Composition root: every dependency is handed over explicitly
    let service = UserService::new(InMemoryUserRepository::new(), Argon2HashProvider::new())
        .with_default_per_page(config.pagination.default_per_page);

    seed(&service, args.seed).await?;

    match args.command {
        Command::Search {
            page,
            per_page,
            sort,
            sort_direction,
            filter,
        } => {
            let input = Command::search_input(page, per_page, sort, sort_direction, filter);
            render("search", service.list_users(input).await)?;
        }
        Command::Demo => demo(&service).await?,
    }

    Ok(())
}
