use super::progress::Spinner;
use super::{fetch, parse_movie_id, tables, App};
use crate::FavoritesCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde_json::json;
use showmar_core::recommend;
use showmar_models::{CatalogRecord, MovieCategory};

pub async fn run_favorites(app: &App, cmd: FavoritesCommands) -> Result<()> {
    match cmd {
        FavoritesCommands::List => list_favorites(app),
        FavoritesCommands::Toggle { id } => toggle_favorite(app, &id).await,
    }
}

fn list_favorites(app: &App) -> Result<()> {
    let favorites = app.favorites().load();

    if !app.output.is_human() {
        app.output.json(&json!({ "favorites": favorites.records() }));
        return Ok(());
    }

    if favorites.is_empty() {
        app.output.info("No favorites yet. Add one with `showmar favorites toggle <id>`.");
        return Ok(());
    }

    // Snapshots are shown as stored; no catalog round-trip
    println!("{}", tables::movies(favorites.records(), &favorites, &[]));
    Ok(())
}

async fn toggle_favorite(app: &App, id: &str) -> Result<()> {
    let movie_id = parse_movie_id(id)?;
    let manager = app.favorites();

    // Removing needs no catalog lookup: the stored snapshot is enough
    let stored = manager.load().records().iter().find(|r| r.id == movie_id).cloned();
    let record = match stored {
        Some(existing) => existing,
        None => {
            let catalog = app.catalog()?;
            let spinner = Spinner::start("Loading movie...", &app.output);
            let details = fetch(catalog.get_movie(&movie_id)).await;
            drop(spinner);
            match details {
                Ok(details) => CatalogRecord::from(details),
                Err(e) => return app.report(e),
            }
        }
    };

    let set = manager.toggle(&record)?;
    let added = set.contains(&record.id);
    if added {
        app.output.success(format!("Added {} to favorites", record.title));
    } else {
        app.output.success(format!("Removed {} from favorites", record.title));
    }
    app.output.json(&json!({ "id": record.id, "favorite": added, "count": set.len() }));
    Ok(())
}

pub async fn run_recommend(app: &App, category: &str) -> Result<()> {
    let category: MovieCategory = category.parse().map_err(|e: String| eyre!(e))?;
    let favorites = app.favorites().load();
    if favorites.is_empty() {
        app.output.info("Add some favorites first; recommendations follow their genres.");
        return Ok(());
    }

    let catalog = app.catalog()?;
    let spinner = Spinner::start("Finding recommendations...", &app.output);
    let fetched = fetch(async {
        let (movies, genres) = futures::join!(catalog.list_movies(category, 1), catalog.list_genres());
        Ok::<_, showmar_sources::SourceError>((movies?, genres?))
    })
    .await;
    drop(spinner);

    let (movies, genres) = match fetched {
        Ok(fetched) => fetched,
        Err(e) => return app.report(e),
    };

    let picks = recommend(&movies, &favorites);
    if !app.output.is_human() {
        app.output.json(&json!({ "recommendations": picks }));
        return Ok(());
    }

    if picks.is_empty() {
        app.output.info("Nothing in this list shares a genre with your favorites.");
    } else {
        app.output.info("Recommended For You");
        println!("{}", tables::movies(&picks, &favorites, &genres));
    }
    Ok(())
}
