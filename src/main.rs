use anyhow::Context;
use clap::{Parser, Subcommand};
use hospitality_client::{
    AppContext,
    api::ListQuery,
    auth::{LoginRequest, RegisterRequest, flow},
    config::Config,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "hospitality-client", about = "Session tooling for the hospitality platform")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 显示当前会话
    Status,
    Login {
        email: String,
        password: String,
    },
    Register {
        email: String,
        password: String,
        confirm_password: String,
        name: String,
    },
    Logout,
    /// 从服务端刷新当前用户
    Me,
    Venues,
    Bookings {
        #[arg(long)]
        venue: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // 加载配置
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::debug!("Using API at {}", config.api_base_url);

    let AppContext {
        config,
        mut session,
        api,
    } = AppContext::bootstrap(config).context("Failed to start client")?;

    match cli.command {
        Command::Status => {
            session.check_expiry();
            let state = session.state();
            println!("variant:       {}", config.app_variant);
            println!("authenticated: {}", state.is_authenticated);
            if let Some(user) = &state.user {
                println!("user:          {} <{}>", user.name, user.email);
            }
            if let Some(ctx) = &state.business_context {
                println!("business:      {}", ctx.business_name);
            }
            match session.tokens().expires_at() {
                Some(at) => match chrono::DateTime::from_timestamp_millis(at) {
                    Some(at) => println!("token expires: {}", at.to_rfc3339()),
                    None => println!("token expires: {}", at),
                },
                None => println!("token expires: -"),
            }
        }
        Command::Login { email, password } => {
            let user = flow::login(&api, &mut session, &LoginRequest { email, password }).await?;
            println!("Signed in as {}", user.name);
        }
        Command::Register {
            email,
            password,
            confirm_password,
            name,
        } => {
            let req = RegisterRequest {
                email,
                password,
                confirm_password,
                name,
            };
            let user = flow::register(&api, &mut session, &req).await?;
            println!("Welcome, {}", user.name);
        }
        Command::Logout => {
            flow::logout(&api, &mut session).await;
            println!("Signed out");
        }
        Command::Me => {
            let user = flow::refresh_user(&api, &mut session).await?;
            println!("{} <{}> roles: {}", user.name, user.email, user.roles.join(","));
        }
        Command::Venues => {
            for venue in flow::guard(&mut session, api.venues().list().await)? {
                println!("{}\t{}\t{}", venue.id, venue.name, venue.address);
            }
        }
        Command::Bookings { venue } => {
            let query = ListQuery {
                venue_id: venue,
                ..ListQuery::default()
            };
            for booking in flow::guard(&mut session, api.bookings().list(&query).await)? {
                println!(
                    "{}\t{}\t{}\t{:?}",
                    booking.id,
                    booking.starts_at.to_rfc3339(),
                    booking.guest_name,
                    booking.status
                );
            }
        }
    }

    Ok(())
}
