use super::progress::Spinner;
use super::{parse_movie_id, prompts, tables, until_interrupted, App};
use crate::ReviewCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde_json::json;
use showmar_core::ReviewCollection;
use showmar_models::ReviewDraft;

pub async fn run_reviews(app: &App, cmd: ReviewCommands) -> Result<()> {
    match cmd {
        ReviewCommands::List { movie } => {
            let Some(collection) = load(app, &movie).await? else {
                return Ok(());
            };
            print_reviews(app, &collection);
            Ok(())
        }
        ReviewCommands::Add { movie, rating, comment } => add_review(app, &movie, rating, comment).await,
        ReviewCommands::Edit { movie, review, rating, comment } => {
            edit_review(app, &movie, &review, rating, comment).await
        }
        ReviewCommands::Delete { movie, review, yes } => delete_review(app, &movie, &review, yes).await,
    }
}

async fn load(app: &App, movie: &str) -> Result<Option<ReviewCollection>> {
    let movie_id = parse_movie_id(movie)?;
    let mut collection = ReviewCollection::new(movie_id, app.backend.clone(), app.credentials.clone(), app.notifier());

    let spinner = Spinner::start("Loading reviews...", &app.output);
    let result = until_interrupted(collection.refresh()).await;
    drop(spinner);

    match result {
        Ok(()) => Ok(Some(collection)),
        Err(e) => {
            app.report(e)?;
            Ok(None)
        }
    }
}

fn print_reviews(app: &App, collection: &ReviewCollection) {
    if !app.output.is_human() {
        app.output.json(&json!({
            "movie_id": collection.movie_id(),
            "reviews": collection.reviews(),
        }));
        return;
    }

    if collection.reviews().is_empty() {
        app.output.info("No reviews yet.");
    } else {
        println!("{}", tables::reviews(collection));
    }
}

/// After a saved change, show the reloaded list, or say why it is missing.
fn print_after_change(app: &App, collection: &ReviewCollection) {
    if collection.is_stale() {
        app.output.warn("Change saved, but the review list could not be reloaded");
        return;
    }
    print_reviews(app, collection);
}

fn refuse_foreign(app: &App, action: &str) {
    app.output.error(&format!("You can only {} your own reviews", action));
}

async fn add_review(app: &App, movie: &str, rating: Option<u8>, comment: Option<String>) -> Result<()> {
    // Login comes first so nobody types a review that cannot be sent
    if !app.ensure_login().await? {
        return Ok(());
    }
    let Some(mut collection) = load(app, movie).await? else {
        return Ok(());
    };

    let rating = match rating {
        Some(rating) => rating,
        None => prompts::prompt_rating(None)?,
    };
    let comment = match comment {
        Some(comment) => comment,
        None => prompts::prompt_required("Comment", None)?,
    };
    *collection.draft_mut() = ReviewDraft::new(rating, comment);

    match until_interrupted(collection.submit()).await {
        Ok(()) => print_after_change(app, &collection),
        Err(e) => app.report(e)?,
    }
    Ok(())
}

async fn edit_review(
    app: &App,
    movie: &str,
    review_id: &str,
    rating: Option<u8>,
    comment: Option<String>,
) -> Result<()> {
    if !app.ensure_login().await? {
        return Ok(());
    }
    let Some(mut collection) = load(app, movie).await? else {
        return Ok(());
    };

    let target = collection
        .reviews()
        .iter()
        .find(|r| r.id == review_id)
        .cloned()
        .ok_or_else(|| eyre!("Review {} not found for movie {}", review_id, movie))?;
    if !collection.can_modify(&target) {
        refuse_foreign(app, "edit");
        return Ok(());
    }

    collection.begin_edit(&target);
    let interactive = rating.is_none() && comment.is_none();
    if let Some(draft) = collection.edit_draft_mut() {
        draft.rating = match rating {
            Some(rating) => rating,
            None if interactive => prompts::prompt_rating(Some(draft.rating))?,
            None => draft.rating,
        };
        draft.comment = match comment {
            Some(comment) => comment,
            None if interactive => prompts::prompt_required("Comment", Some(draft.comment.as_str()))?,
            None => draft.comment.clone(),
        };
    }

    match until_interrupted(collection.submit_edit()).await {
        Ok(()) => print_after_change(app, &collection),
        Err(e) => app.report(e)?,
    }
    Ok(())
}

async fn delete_review(app: &App, movie: &str, review_id: &str, yes: bool) -> Result<()> {
    if !app.ensure_login().await? {
        return Ok(());
    }
    let Some(mut collection) = load(app, movie).await? else {
        return Ok(());
    };

    let target = collection
        .reviews()
        .iter()
        .find(|r| r.id == review_id)
        .ok_or_else(|| eyre!("Review {} not found for movie {}", review_id, movie))?;
    if !collection.can_modify(target) {
        refuse_foreign(app, "delete");
        return Ok(());
    }

    let confirm = |prompt: &str| yes || prompts::prompt_yes_no(prompt, false).unwrap_or(false);
    match until_interrupted(collection.remove(review_id, &confirm)).await {
        Ok(true) => print_after_change(app, &collection),
        Ok(false) => app.output.info("Review kept"),
        Err(e) => app.report(e)?,
    }
    Ok(())
}
