use autokit_core::{BotConfig, CoreError, ErrorExt, ThemeWeights};
use llm_interface::{LlmProvider, OpenAiProvider};
use scheduler::PostScheduler;
use twitter_client::{Publisher, TwitterApiClient};

const USER_AGENT: &str = concat!("autokit/", env!("CARGO_PKG_VERSION"));

#[tokio::main]
async fn main() -> Result<(), CoreError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter("autokit=debug,twitter_client=debug,llm_interface=debug,scheduler=debug")
        .init();

    tracing::info!("Starting Autokit posting bot");

    let config = BotConfig::from_env().map_err(|e| {
        tracing::error!("Startup failed: {}", e.user_friendly_message());
        e
    })?;

    let generator = OpenAiProvider::from_config(&config);
    let mut api = TwitterApiClient::new(config.twitter.clone(), USER_AGENT.to_string());
    if config.twitter.refresh_token.is_some() {
        api.refresh_access_token().await?;
    }
    let publisher = Publisher::new(api);

    if config.run_scheduler {
        let themes = config.themes.clone();
        let mut post_scheduler = PostScheduler::new(&config.posting_schedule);
        post_scheduler
            .run(|| compose_and_post(&themes, &generator, &publisher))
            .await;
        return Ok(());
    }

    // Direct execution posts once immediately; the scheduled loop only runs
    // behind the AUTOKIT_SCHEDULE switch.
    compose_and_post(&config.themes, &generator, &publisher).await?;
    Ok(())
}

/// One full posting round: pick a theme, generate text, publish.
async fn compose_and_post(
    themes: &ThemeWeights,
    generator: &OpenAiProvider,
    publisher: &Publisher,
) -> Result<(), CoreError> {
    let mut rng = fastrand::Rng::new();
    let theme = themes.choose(&mut rng);
    tracing::info!("Selected theme: {}", theme);

    let text = generator.generate_post(theme).await?;

    match publisher.publish(&text, None).await {
        Ok(receipt) => {
            tracing::info!("Tweet {} published", receipt.tweet_id);
            Ok(())
        }
        Err(e) => {
            // Publish failures are reported, never propagated as a crash.
            e.log_error();
            tracing::warn!("Post was not published: {}", e.user_friendly_message());
            Ok(())
        }
    }
}
