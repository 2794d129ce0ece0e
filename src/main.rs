use anyhow::Result;
use clap::Parser;
use dental_chat_proxy::ai::GeminiChatClient;
use dental_chat_proxy::credentials::{CredentialProvider, EnvCredentials};
use dental_chat_proxy::models::Config;
use dental_chat_proxy::proxy::ChatProxy;
use dental_chat_proxy::server::{self, AppState};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "dental-chat-proxy")]
#[command(about = "Forward patient questions from the practice website to Gemini")]
struct CliArgs {
    /// Address to listen on, overriding BIND_ADDR.
    #[arg(long, value_name = "ADDR")]
    bind: Option<String>,

    /// Gemini model ID, overriding GEMINI_MODEL.
    #[arg(long, value_name = "MODEL")]
    model: Option<String>,
}

impl CliArgs {
    fn apply(self, mut config: Config) -> Config {
        if let Some(bind) = self.bind {
            config.bind_addr = bind;
        }
        if let Some(model) = self.model {
            config.gemini_model = model;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dental_chat_proxy=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting dental-chat-proxy");

    let args = CliArgs::parse();
    let config = match Config::from_env() {
        Ok(config) => args.apply(config),
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let credentials = EnvCredentials::new(config.api_key_var.clone());
    if credentials.api_key().is_none() {
        // Requests will get the degraded reply until the key is provided.
        warn!("{} is not set", credentials.var());
    }

    let chat = GeminiChatClient::new(config.gemini_model.clone(), config.upstream_timeout)
        .with_base_url(config.gemini_base_url.clone());
    info!("Chat provider: Gemini (model: {})", chat.model());

    let proxy = ChatProxy::new(Arc::new(chat), Arc::new(credentials));
    let state = Arc::new(AppState::new(proxy));

    server::serve(&config, state).await?;
    Ok(())
}
