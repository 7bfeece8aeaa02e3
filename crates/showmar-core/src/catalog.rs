use showmar_models::Genre;

/// Look a genre up by numeric id or case-insensitive name.
pub fn find_genre<'a>(genres: &'a [Genre], query: &str) -> Option<&'a Genre> {
    let query = query.trim();
    if let Ok(id) = query.parse::<u32>() {
        return genres.iter().find(|g| g.id == id);
    }
    genres.iter().find(|g| g.name.eq_ignore_ascii_case(query))
}

/// Names for `ids`, skipping ids the genre list does not know.
pub fn genre_names<'a>(genres: &'a [Genre], ids: &[u32]) -> Vec<&'a str> {
    ids.iter()
        .filter_map(|id| genres.iter().find(|g| g.id == *id))
        .map(|g| g.name.as_str())
        .collect()
}

pub fn trailer_search_url(title: &str) -> String {
    format!(
        "https://www.youtube.com/results?search_query={}+trailer",
        urlencoding::encode(title)
    )
}
