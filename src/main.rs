use std::io;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::Instrument;
use uuid::Uuid;

use show_suggester::{
    cli::{format_enrichment, format_recommendation, prompt_favorites, Args},
    config::Config,
    data,
    services::{
        generators::{enrich, ContentGenerator, DisabledGenerator, OpenAiGenerator},
        posters::{HttpImageSource, PosterGallery},
        Recommender,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;

    let embeddings_path = args.embeddings.clone().unwrap_or(config.embeddings_path.clone());
    let catalog_path = args.catalog.clone().unwrap_or(config.catalog_path.clone());

    let embeddings = data::load_embeddings(&embeddings_path).with_context(|| {
        format!("Failed to load embeddings from {}", embeddings_path.display())
    })?;
    let catalog = data::load_catalog(&catalog_path, &embeddings)
        .with_context(|| format!("Failed to load catalog from {}", catalog_path.display()))?;

    let favorites = prompt_favorites(&catalog, &mut io::stdin().lock(), &mut io::stdout())?;

    let limit = args
        .limit
        .map(usize::from)
        .unwrap_or(config.recommendation_limit);
    let generator = build_generator(&args, &config);

    let span = tracing::info_span!("recommendation", request_id = %Uuid::new_v4());
    async move {
        let recommendations = Recommender::new(&catalog).with_limit(limit).rank(&favorites);

        if recommendations.is_empty() {
            println!("\nNo recommendations could be made for these shows.");
            return Ok(());
        }

        println!("\nHere are the TV shows that I think you would love:\n");
        for rec in &recommendations {
            println!("{}\n", format_recommendation(rec));
        }

        let Some(content) = enrich(generator.as_ref(), &favorites, &recommendations).await else {
            println!("AI-generated shows/ads were skipped (OpenAI API not available).");
            println!("You can still use the recommendations normally.");
            return Ok(());
        };

        println!("{}", format_enrichment(&content));

        let urls = content.poster_urls();
        if urls.is_empty() {
            return Ok(());
        }

        println!("Here are also the 2 TV show ads. Hope you like them!");
        let gallery = HttpImageSource::new(Duration::from_secs(config.poster_timeout_secs)).map(
            |source| {
                PosterGallery::new(
                    source,
                    args.placeholder.clone().unwrap_or(config.placeholder_image.clone()),
                    args.poster_dir.clone().unwrap_or(config.poster_dir.clone()),
                )
            },
        );
        let saved = match gallery {
            Ok(gallery) => gallery.save_pair(&urls).await,
            Err(e) => Err(e),
        };

        match saved {
            Ok(path) => println!("{}", path.display()),
            Err(e) => {
                tracing::warn!(error = %e, "Poster display failed");
                println!("\nCould not display images: {}", e);
            }
        }

        anyhow::Ok(())
    }
    .instrument(span)
    .await
}

fn build_generator(args: &Args, config: &Config) -> Box<dyn ContentGenerator> {
    if args.no_ai {
        return Box::new(DisabledGenerator::new("disabled with --no-ai"));
    }

    match config.api_key() {
        Some(api_key) => Box::new(OpenAiGenerator::new(
            api_key.to_string(),
            config.openai_api_url.clone(),
            config.openai_chat_model.clone(),
            config.openai_image_model.clone(),
        )),
        None => Box::new(DisabledGenerator::new("OPENAI_API_KEY is not set")),
    }
}
