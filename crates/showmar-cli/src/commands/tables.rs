use comfy_table::{Attribute, Cell, Color, Table};
use showmar_core::catalog::genre_names;
use showmar_core::{FavoriteSet, ReviewCollection};
use showmar_models::{CatalogRecord, Genre};

fn styled(mut table: Table) -> Table {
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

fn header(titles: &[&str]) -> Vec<Cell> {
    titles
        .iter()
        .map(|t| Cell::new(t).fg(Color::Cyan).add_attribute(Attribute::Bold))
        .collect()
}

pub fn movies(records: &[CatalogRecord], favorites: &FavoriteSet, genres: &[Genre]) -> Table {
    let mut table = Table::new();
    table.set_header(header(&["", "ID", "Title", "Year", "Rating", "Genres"]));

    for record in records {
        let marker = if favorites.contains(&record.id) { "♥" } else { "" };
        let rating = record
            .vote_average
            .map(|r| format!("{:.1}", r))
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(marker).fg(Color::Red),
            Cell::new(record.id.as_str()),
            Cell::new(&record.title),
            Cell::new(record.release_year().unwrap_or("-")),
            Cell::new(rating),
            Cell::new(genre_names(genres, &record.genre_ids).join(", ")),
        ]);
    }

    styled(table)
}

pub fn reviews(collection: &ReviewCollection) -> Table {
    let mut table = Table::new();
    table.set_header(header(&["ID", "Author", "Rating", "Comment", ""]));

    for review in collection.reviews() {
        let yours = if collection.can_modify(review) { "yours" } else { "" };
        table.add_row(vec![
            Cell::new(&review.id),
            Cell::new(review.display_name()),
            Cell::new(format!("{}/10", review.rating)),
            Cell::new(&review.comment),
            Cell::new(yours).fg(Color::Green),
        ]);
    }

    styled(table)
}

pub fn genres(genres: &[Genre]) -> Table {
    let mut table = Table::new();
    table.set_header(header(&["ID", "Name"]));
    for genre in genres {
        table.add_row(vec![Cell::new(genre.id), Cell::new(&genre.name)]);
    }
    styled(table)
}

/// Two-column key/value table; rows with no value are skipped.
pub fn details(title: &str, rows: Vec<(&str, Option<String>)>) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new(title).fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);
    for (label, value) in rows {
        if let Some(value) = value {
            table.add_row(vec![Cell::new(label).add_attribute(Attribute::Bold), Cell::new(value)]);
        }
    }
    styled(table)
}
