use clap::Parser;
use ledger::{InMemoryStore, Ledger};
use server::{ServerState, StaticVerifier};

mod settings;

#[derive(Debug, Parser)]
#[command(name = "expense_tracker", version)]
struct Args {
    /// Optional settings file (TOML). Defaults to `settings.toml` when present.
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();
    let settings = settings::Settings::new(args.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "expense_tracker={level},server={level},ledger={level}",
            level = settings.log_level
        ))
        .init();

    let ledger = Ledger::builder()
        .store(std::sync::Arc::new(InMemoryStore::default()))
        .build();
    let verifier = StaticVerifier::new([(
        settings.dev_auth_token.clone(),
        settings.dev_auth_uid.clone(),
    )]);
    let state = ServerState::new(ledger, verifier).request_timeout(settings.request_timeout());

    let listener = tokio::net::TcpListener::bind(settings.address()).await?;
    tracing::info!(
        "listening on {} (env={})",
        listener.local_addr()?,
        settings.app_env
    );

    server::run_with_listener(state, listener).await?;
    Ok(())
}
