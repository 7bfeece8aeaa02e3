use super::progress::Spinner;
use super::{fetch, tables, App};
use crate::BrowseArgs;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde_json::json;
use showmar_core::apply_filters;
use showmar_core::catalog::find_genre;
use showmar_models::{FilterSpec, MovieCategory, SortKey};
use showmar_sources::SourceError;

pub async fn run_browse(app: &App, args: BrowseArgs) -> Result<()> {
    let category: MovieCategory = args.category.parse().map_err(|e: String| eyre!(e))?;
    let sort = match args.sort.as_deref() {
        Some(s) => s.parse::<SortKey>().map_err(|e| eyre!(e))?,
        None => SortKey::None,
    };
    let catalog = app.catalog()?;

    let spinner = Spinner::start(&format!("Loading {} movies...", category), &app.output);
    let fetched = fetch(async {
        let (movies, genres) = futures::join!(catalog.list_movies(category, args.page), catalog.list_genres());
        Ok::<_, SourceError>((movies?, genres?))
    })
    .await;
    drop(spinner);

    let (movies, genres) = match fetched {
        Ok(fetched) => fetched,
        Err(e) => return app.report(e),
    };

    let genre_id = match args.genre.as_deref() {
        Some(query) => Some(
            find_genre(&genres, query)
                .map(|g| g.id)
                .ok_or_else(|| eyre!("Unknown genre: {}. Run `showmar genres` to list them", query))?,
        ),
        None => None,
    };

    let spec = FilterSpec {
        title: args.title.unwrap_or_default(),
        genre_id,
        year: args.year,
        min_rating: args.min_rating,
        sort,
    };
    tracing::debug!(?spec, fetched = movies.len(), "Applying filters");
    let view = apply_filters(&movies, &spec);

    if !app.output.is_human() {
        app.output.json(&json!({
            "category": category,
            "page": args.page,
            "filters": spec,
            "movies": view,
        }));
        return Ok(());
    }

    if view.is_empty() {
        app.output.warn("No movies match these filters");
        return Ok(());
    }

    let favorites = app.favorites().load();
    println!("{}", tables::movies(&view, &favorites, &genres));
    app.output.info(format!("{} of {} movies on page {}", view.len(), movies.len(), args.page));
    Ok(())
}

pub async fn run_genres(app: &App) -> Result<()> {
    let catalog = app.catalog()?;
    let genres = match fetch(catalog.list_genres()).await {
        Ok(genres) => genres,
        Err(e) => return app.report(e),
    };

    if app.output.is_human() {
        println!("{}", tables::genres(&genres));
    } else {
        app.output.json(&json!({ "genres": genres }));
    }
    Ok(())
}
