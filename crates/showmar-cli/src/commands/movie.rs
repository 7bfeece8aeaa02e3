use super::progress::Spinner;
use super::{parse_movie_id, tables, until_interrupted, App};
use color_eyre::Result;
use owo_colors::OwoColorize;
use serde_json::json;
use showmar_core::catalog::trailer_search_url;
use showmar_core::{ClientError, ReviewCollection, WatchlistReconciler};
use showmar_models::{CatalogDetails, CatalogRecord};

pub async fn run_movie(app: &App, id: &str, toggle_favorite: bool, add_to_watchlist: bool) -> Result<()> {
    let movie_id = parse_movie_id(id)?;
    let catalog = app.catalog()?;
    let mut reviews = ReviewCollection::new(movie_id.clone(), app.backend.clone(), app.credentials.clone(), app.notifier());

    let spinner = Spinner::start("Loading movie...", &app.output);
    let loaded = until_interrupted(async {
        let (details, _) = futures::join!(catalog.get_movie(&movie_id), reviews.refresh());
        details.map_err(ClientError::from)
    })
    .await;
    drop(spinner);

    let details = match loaded {
        Ok(details) => details,
        Err(e) => return app.report(e),
    };
    let record = CatalogRecord::from(details.clone());

    if toggle_favorite {
        let set = app.favorites().toggle(&record)?;
        if set.contains(&record.id) {
            app.output.success(format!("Added {} to favorites", record.title));
        } else {
            app.output.success(format!("Removed {} from favorites", record.title));
        }
    }

    if add_to_watchlist && app.ensure_login().await? {
        let watchlist = WatchlistReconciler::new(app.backend.clone(), catalog.clone(), app.credentials.clone(), app.notifier());
        if let Err(e) = until_interrupted(watchlist.add(&movie_id)).await {
            app.report(e)?;
        }
    }

    let is_favorite = app.favorites().is_favorite(&movie_id);
    let poster_url = record.poster_url(&app.config.catalog.image_base_url);
    let trailer_url = trailer_search_url(&details.title);

    if !app.output.is_human() {
        app.output.json(&json!({
            "movie": details,
            "favorite": is_favorite,
            "poster_url": poster_url,
            "trailer_url": trailer_url,
            "reviews": reviews.reviews(),
        }));
        return Ok(());
    }

    print_details(&details, is_favorite, poster_url, trailer_url);

    if reviews.reviews().is_empty() {
        println!("No reviews yet.");
    } else {
        println!("{}", "Reviews".bold());
        println!("{}", tables::reviews(&reviews));
    }
    Ok(())
}

fn print_details(details: &CatalogDetails, is_favorite: bool, poster_url: Option<String>, trailer_url: String) {
    let title = match details.release_date.as_deref().and_then(|d| d.get(..4)) {
        Some(year) => format!("{} ({})", details.title, year),
        None => details.title.clone(),
    };

    let table = tables::details(
        &title,
        vec![
            ("Tagline", details.tagline.clone()),
            ("Released", details.release_date.clone()),
            ("Runtime", details.runtime.map(|m| format!("{}h {}m", m / 60, m % 60))),
            ("Rating", details.vote_average.map(|r| format!("{:.1}/10", r))),
            ("Genres", Some(details.genre_names().join(", ")).filter(|g| !g.is_empty())),
            ("Overview", details.overview.clone().filter(|o| !o.is_empty())),
            ("Favorite", Some(if is_favorite { "yes" } else { "no" }.to_string())),
            ("Poster", poster_url),
            ("Trailer", Some(trailer_url)),
        ],
    );
    println!("{}", table);
}
