use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::Parser;

use crate::{
    error::{AppError, AppResult},
    models::{Catalog, EnrichedContent, Recommendation},
    services::reconcile,
};

/// Minimum number of favorites the prompt accepts
pub const MIN_FAVORITES: usize = 2;

#[derive(Debug, Parser)]
#[command(name = "show-suggester", version)]
#[command(about = "Recommends TV shows similar to the ones you love")]
pub struct Args {
    #[arg(long, value_name = "FILE", help = "Catalog CSV (overrides CATALOG_PATH)")]
    pub catalog: Option<PathBuf>,

    #[arg(
        long,
        value_name = "FILE",
        help = "Embedding table JSON (overrides EMBEDDINGS_PATH)"
    )]
    pub embeddings: Option<PathBuf>,

    #[arg(
        long,
        value_name = "DIR",
        help = "Directory for generated posters (overrides POSTER_DIR)"
    )]
    pub poster_dir: Option<PathBuf>,

    #[arg(
        long,
        value_name = "FILE",
        help = "Image used when a poster cannot be fetched (overrides PLACEHOLDER_IMAGE)"
    )]
    pub placeholder: Option<PathBuf>,

    #[arg(
        long,
        value_name = "N",
        value_parser = clap::value_parser!(u16).range(1..),
        help = "Number of recommendations (overrides RECOMMENDATION_LIMIT)"
    )]
    pub limit: Option<u16>,

    #[arg(long, help = "Skip AI-generated shows and posters")]
    pub no_ai: bool,
}

/// Splits comma-separated input into trimmed, non-empty titles
pub fn parse_favorites(line: &str) -> Vec<String> {
    line.split(',')
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .map(str::to_string)
        .collect()
}

/// Asks for favorites until the user confirms the reconciled titles
///
/// Input with fewer than two titles is rejected and asked again. Anything but `y` at
/// the confirmation step starts over. Closing the input is an error.
pub fn prompt_favorites<R, W>(
    catalog: &Catalog,
    input: &mut R,
    output: &mut W,
) -> AppResult<Vec<String>>
where
    R: BufRead,
    W: Write,
{
    loop {
        writeln!(
            output,
            "Which TV shows did you love watching?\nSeparate them by a comma and make sure to enter more than 1 show"
        )?;
        let favorites = parse_favorites(&read_line(input)?);

        if favorites.len() < MIN_FAVORITES {
            writeln!(output, "Please enter more than 1 show, separated by commas.\n")?;
            continue;
        }

        let reconciled = reconcile(&favorites, catalog);
        writeln!(
            output,
            "Just to make sure, do you mean {}? (y/n)",
            reconciled.join(", ")
        )?;

        if read_line(input)?.trim().eq_ignore_ascii_case("y") {
            writeln!(output, "\nGreat! Generating recommendations...")?;
            return Ok(reconciled);
        }

        writeln!(
            output,
            "\nSorry about that. Let's try again, please make sure to write the show names correctly.\n"
        )?;
    }
}

fn read_line<R: BufRead>(input: &mut R) -> AppResult<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(AppError::InvalidInput("input closed".to_string()));
    }
    Ok(line)
}

/// One recommendation as shown to the user, e.g. `Dark (87%)`
pub fn format_recommendation(rec: &Recommendation) -> String {
    format!("{} ({}%)", rec.title(), rec.percent())
}

pub fn format_enrichment(content: &EnrichedContent) -> String {
    format!(
        "I have also created just for you two shows which I think you would love.\n\
         Show #1 is based on the fact that you loved the input shows that you gave me.\n\
         Its name is {} and it is about {}\n\
         Show #2 is based on the shows that I recommended for you.\n\
         Its name is {} and it is about {}",
        content.from_favorites.title,
        content.from_favorites.description,
        content.from_recommendations.title,
        content.from_recommendations.description,
    )
}
