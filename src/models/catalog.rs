use serde::{Deserialize, Deserializer, Serialize};

/// Decodes an OMDb string field, turning the `"N/A"` sentinel (and blank
/// strings) into `None` so that "unknown value" is a typed state instead
/// of a magic string.
pub fn na_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty() && s != "N/A"))
}

/// One candidate match from a free-text catalog search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    /// The catalog's unique identifier for the title.
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    /// The title.
    #[serde(rename = "Title")]
    pub title: String,
    /// The release year.
    #[serde(rename = "Year", default, deserialize_with = "na_as_none")]
    pub year: Option<String>,
    /// The kind of record: movie, series, episode.
    #[serde(rename = "Type", default, deserialize_with = "na_as_none")]
    pub kind: Option<String>,
    /// The poster URL.
    #[serde(rename = "Poster", default, deserialize_with = "na_as_none")]
    pub poster: Option<String>,
}

/// The full catalog record for one title, fetched by identifier. Doubles
/// as the add-to-watchlist payload: the fields below are the snapshot the
/// repository captures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    /// The catalog's unique identifier for the title.
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    /// The title.
    #[serde(rename = "Title")]
    pub title: String,
    /// The release year.
    #[serde(rename = "Year", default, deserialize_with = "na_as_none")]
    pub year: Option<String>,
    /// The director.
    #[serde(rename = "Director", default, deserialize_with = "na_as_none")]
    pub director: Option<String>,
    /// The IMDb rating.
    #[serde(rename = "imdbRating", default, deserialize_with = "na_as_none")]
    pub imdb_rating: Option<String>,
    /// The poster URL.
    #[serde(rename = "Poster", default, deserialize_with = "na_as_none")]
    pub poster: Option<String>,
    /// The plot summary.
    #[serde(rename = "Plot", default, deserialize_with = "na_as_none")]
    pub plot: Option<String>,
    /// The main cast.
    #[serde(rename = "Actors", default, deserialize_with = "na_as_none")]
    pub actors: Option<String>,
    /// The genres.
    #[serde(rename = "Genre", default, deserialize_with = "na_as_none")]
    pub genre: Option<String>,
    /// The runtime.
    #[serde(rename = "Runtime", default, deserialize_with = "na_as_none")]
    pub runtime: Option<String>,
    /// The kind of record: movie, series, episode.
    #[serde(rename = "Type", default, deserialize_with = "na_as_none")]
    pub kind: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn na_sentinel_decodes_to_none() {
        let hit: SearchHit = sonic_rs::from_str(
            r#"{"imdbID":"tt0133093","Title":"The Matrix","Year":"1999","Type":"movie","Poster":"N/A"}"#,
        )
        .unwrap();
        assert_eq!(hit.poster, None);
        assert_eq!(hit.year.as_deref(), Some("1999"));
    }

    #[test]
    fn blank_and_missing_fields_decode_to_none() {
        let hit: SearchHit =
            sonic_rs::from_str(r#"{"imdbID":"tt0133093","Title":"The Matrix","Year":"  "}"#)
                .unwrap();
        assert_eq!(hit.year, None);
        assert_eq!(hit.kind, None);
        assert_eq!(hit.poster, None);
    }

    #[test]
    fn details_decode_full_record() {
        let details: MovieDetails = sonic_rs::from_str(
            r#"{
                "imdbID": "tt0133093",
                "Title": "The Matrix",
                "Year": "1999",
                "Director": "Lana Wachowski, Lilly Wachowski",
                "imdbRating": "8.7",
                "Poster": "https://example.com/matrix.jpg",
                "Plot": "A computer hacker learns about the true nature of reality.",
                "Actors": "Keanu Reeves, Laurence Fishburne",
                "Genre": "Action, Sci-Fi",
                "Runtime": "136 min",
                "Type": "movie",
                "Response": "True"
            }"#,
        )
        .unwrap();
        assert_eq!(details.imdb_id, "tt0133093");
        assert_eq!(details.imdb_rating.as_deref(), Some("8.7"));
        assert_eq!(details.runtime.as_deref(), Some("136 min"));
    }

    #[test]
    fn details_with_na_director_decode_to_none() {
        let details: MovieDetails = sonic_rs::from_str(
            r#"{"imdbID":"tt1234567","Title":"Some Short","Director":"N/A","imdbRating":"N/A"}"#,
        )
        .unwrap();
        assert_eq!(details.director, None);
        assert_eq!(details.imdb_rating, None);
    }
}
