use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use eshop_session::auth::{current_timestamp, decode_claims, AuthClient};
use eshop_session::config::{load_config, print_schema, SITE};
use eshop_session::cookie::CookieJar;
use eshop_session::models::display_name;
use eshop_session::state::{SessionContext, SessionState};
use eshop_session::utils::logger::init_logging;

#[derive(Parser)]
#[command(name = "eshop-session")]
#[command(about = "Log in to the EShop console API and manage the stored session")]
#[command(version)]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, global = true, default_value = "./eshop-session.yaml")]
    config: PathBuf,

    /// Override the compiled-in API server
    #[arg(long, global = true)]
    api_server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and store the returned token
    Login { email: String, password: String },
    /// Create an account (does not log in)
    Signup { username: String, password: String },
    /// Exchange the stored token for a fresh one
    Renew,
    /// Renew the stored token if there is one, ignoring failures
    Validate,
    /// Forget the stored session
    Logout,
    /// Show who the stored token belongs to, without contacting the API
    Whoami,
    /// Print the stored token as a cookie assignment
    Cookie {
        /// Cookie lifetime in days; omit for a session cookie
        #[arg(long)]
        days: Option<i64>,
    },
    /// Print the compiled-in site settings
    Site,
    /// Print the JSON schema of the configuration file
    Schema,
}

fn print_state(state: &SessionState) {
    match state.user_name() {
        Some(name) => println!("logged in as {}", name),
        None => println!("logged in"),
    }
}

async fn run(cli: Cli, session: SessionContext) -> Result<(), Box<dyn std::error::Error>> {
    let mut client = AuthClient::new(session.clone());
    if let Some(api_server) = cli.api_server {
        client = client.with_api_server(api_server);
    }

    match cli.command {
        Command::Login { email, password } => match client.login(&email, &password).await? {
            Some(state) => print_state(&state),
            None => println!("no email given, nothing sent"),
        },
        Command::Signup { username, password } => {
            client.signup(&username, &password).await?;
            println!("signed up {}", username);
        }
        Command::Renew => {
            let token = session.stored_token()?.ok_or("no stored session token")?;
            print_state(&client.renew(&token).await?);
        }
        Command::Validate => {
            client.validate_login().await;
            let state = session.snapshot();
            if state.is_logged_in() {
                print_state(&state);
            } else {
                println!("not logged in");
            }
        }
        Command::Logout => {
            client.logout();
            println!("logged out");
        }
        Command::Whoami => match session.stored_token()? {
            // read-only: never adopts, rewrites or rejects the stored token
            Some(token) => {
                let claims = decode_claims(&token)?;
                match claims.user.as_ref().map(display_name) {
                    Some(name) => println!("token for {}", name),
                    None => println!("token without user"),
                }
                if claims.is_expired_at(current_timestamp()) {
                    println!("expired {}", claims.exp);
                } else {
                    println!("expires {}", claims.exp);
                }
            }
            None => println!("not logged in"),
        },
        Command::Cookie { days } => {
            let token = session.stored_token()?.ok_or("no stored session token")?;
            let mut jar = CookieJar::new();
            println!("{}", jar.set_cookie(SITE.token_name, &token, days));
        }
        Command::Site => println!("{}", serde_json::to_string_pretty(&SITE)?),
        Command::Schema => print_schema()?,
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("Error initializing logging: {}", e);
        std::process::exit(1);
    }
    info!("Loaded configuration from {}", cli.config.display());

    let session = match SessionContext::from_config(&config.store) {
        Ok(session) => session,
        Err(e) => {
            error!("Failed to open the token store: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cli, session).await {
        error!("Command failed: {}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
