use super::App;
use crate::ThemeCommands;
use color_eyre::Result;
use serde_json::json;

pub fn run_theme(app: &App, cmd: ThemeCommands) -> Result<()> {
    let preference = app.theme();
    let theme = match cmd {
        ThemeCommands::Show => preference.current(),
        ThemeCommands::Toggle => {
            let theme = preference.toggle()?;
            app.output.success(format!("Switched to {} mode", theme));
            theme
        }
    };

    if app.output.is_human() {
        app.output.info(format!("Theme: {}", theme));
    } else {
        app.output.json(&json!({ "theme": theme }));
    }
    Ok(())
}
