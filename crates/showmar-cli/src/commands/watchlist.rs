use super::progress::Spinner;
use super::{parse_movie_id, tables, until_interrupted, App};
use crate::WatchlistCommands;
use color_eyre::Result;
use serde_json::json;
use showmar_core::{ClientError, WatchlistReconciler};

pub async fn run_watchlist(app: &App, cmd: WatchlistCommands) -> Result<()> {
    if !app.ensure_login().await? {
        return Ok(());
    }

    let catalog = app.catalog()?;
    let mut reconciler = WatchlistReconciler::new(app.backend.clone(), catalog, app.credentials.clone(), app.notifier());

    match cmd {
        WatchlistCommands::Show => {
            if load(app, &mut reconciler).await? {
                show(app, &reconciler);
            }
        }
        WatchlistCommands::Add { id } => {
            let movie_id = parse_movie_id(&id)?;
            if let Err(e) = until_interrupted(reconciler.add(&movie_id)).await {
                return app.report(e);
            }
        }
        WatchlistCommands::Remove { id } => {
            let movie_id = parse_movie_id(&id)?;
            if !load(app, &mut reconciler).await? {
                return Ok(());
            }
            if !reconciler.ids().contains(&movie_id) {
                app.output.warn(format!("Movie {} is not on your watchlist", movie_id));
                return Ok(());
            }
            if let Err(e) = until_interrupted(reconciler.remove(&movie_id)).await {
                return app.report(e);
            }
            show(app, &reconciler);
        }
    }

    Ok(())
}

/// Returns `false` when the load failed or was interrupted.
async fn load(app: &App, reconciler: &mut WatchlistReconciler) -> Result<bool> {
    let spinner = Spinner::start("Loading watchlist...", &app.output);
    let result = until_interrupted(reconciler.load()).await;
    drop(spinner);

    match result {
        Ok(()) => Ok(true),
        // The reconciler has already reset itself and notified the user
        Err(e @ ClientError::Hydration { .. }) => Err(e.into()),
        Err(e) => {
            reconciler.abandon();
            app.report(e)?;
            Ok(false)
        }
    }
}

fn show(app: &App, reconciler: &WatchlistReconciler) {
    let records: Vec<_> = reconciler.display().into_iter().cloned().collect();

    if !app.output.is_human() {
        app.output.json(&json!({ "watchlist": records }));
        return;
    }

    if records.is_empty() {
        app.output.info("Your watchlist is empty.");
        return;
    }

    let favorites = app.favorites().load();
    println!("{}", tables::movies(&records, &favorites, &[]));
}
