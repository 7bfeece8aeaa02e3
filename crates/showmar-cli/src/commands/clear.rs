use super::App;
use color_eyre::Result;
use showmar_config::{FAVORITES_KEY, THEME_KEY, TOKEN_KEY};

pub fn run_clear(app: &App, all: bool, favorites: bool, credentials: bool, theme: bool) -> Result<()> {
    if all {
        clear_favorites(app)?;
        clear_credentials(app)?;
        clear_theme(app)?;
        app.output.success(format!(
            "All favorites, credentials and theme settings cleared from {}",
            app.paths.store_file().display()
        ));
        return Ok(());
    }

    let mut cleared_anything = false;

    if favorites {
        clear_favorites(app)?;
        cleared_anything = true;
    }

    if credentials {
        clear_credentials(app)?;
        cleared_anything = true;
    }

    if theme {
        clear_theme(app)?;
        cleared_anything = true;
    }

    if !cleared_anything {
        app.output.warn("No clear option specified. Use --favorites, --credentials, --theme, or --all");
        app.output.info("\nExample: showmar clear --favorites");
    }

    Ok(())
}

fn clear_favorites(app: &App) -> Result<()> {
    if app.store.get(FAVORITES_KEY).is_none() {
        app.output.info("No favorites found to clear");
        return Ok(());
    }
    app.favorites().clear()?;
    app.output.success("Cleared favorites");
    Ok(())
}

fn clear_credentials(app: &App) -> Result<()> {
    if app.store.get(TOKEN_KEY).is_none() {
        app.output.info("No stored login found to clear");
        return Ok(());
    }
    app.credentials.set_credential(None)?;
    app.output.success("Cleared stored login");
    Ok(())
}

fn clear_theme(app: &App) -> Result<()> {
    if app.store.get(THEME_KEY).is_none() {
        app.output.info("No theme preference found to clear");
        return Ok(());
    }
    app.theme().clear()?;
    app.output.success("Cleared theme preference");
    Ok(())
}
