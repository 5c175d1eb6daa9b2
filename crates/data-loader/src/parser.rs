//! Parser for MovieLens CSV files.
//!
//! - movies.csv: movieId,title,genres
//! - ratings.csv: userId,movieId,rating,timestamp
//!
//! Both files carry a header row. Columns are matched by name, so extra
//! columns are ignored and `timestamp` may be missing. Titles that contain
//! commas are quoted, which is why this goes through the `csv` crate rather
//! than a plain `split(',')`.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use serde::Deserialize;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

const NO_GENRES: &str = "(no genres listed)";

#[derive(Debug, Deserialize)]
struct MovieRecord {
    #[serde(rename = "movieId")]
    movie_id: MovieId,
    title: String,
    #[serde(default)]
    genres: String,
}

#[derive(Debug, Deserialize)]
struct RatingRecord {
    #[serde(rename = "userId")]
    user_id: UserId,
    #[serde(rename = "movieId")]
    movie_id: MovieId,
    rating: f32,
    #[serde(default)]
    timestamp: i64,
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            DataLoadError::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            DataLoadError::IoError(e)
        }
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Parse the movies.csv file
pub fn parse_movies(path: &Path) -> Result<Vec<Movie>> {
    parse_movies_from_reader(open(path)?, &file_name(path))
}

/// Parse movies from any CSV source. `source` only labels errors.
pub fn parse_movies_from_reader<R: Read>(reader: R, source: &str) -> Result<Vec<Movie>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut movies = Vec::new();

    for record in rdr.deserialize::<MovieRecord>() {
        let record = record.map_err(|e| DataLoadError::from_csv(source, e))?;
        // Kept verbatim: favourites are matched against it exactly
        movies.push(Movie {
            id: record.movie_id,
            year: extract_year_from_title(record.title.trim()),
            genres: parse_genres(&record.genres),
            title: record.title,
        });
    }
    Ok(movies)
}

/// Parse the ratings.csv file
pub fn parse_ratings(path: &Path) -> Result<Vec<Rating>> {
    parse_ratings_from_reader(open(path)?, &file_name(path))
}

/// Parse ratings from any CSV source. `source` only labels errors.
pub fn parse_ratings_from_reader<R: Read>(reader: R, source: &str) -> Result<Vec<Rating>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut ratings = Vec::new();

    for record in rdr.deserialize::<RatingRecord>() {
        let record = record.map_err(|e| DataLoadError::from_csv(source, e))?;
        ratings.push(Rating {
            user_id: record.user_id,
            movie_id: record.movie_id,
            rating: record.rating,
            timestamp: record.timestamp,
        });
    }
    Ok(ratings)
}

/// Extract year from movie title
///
/// Example: "Toy Story (1995)" -> Some(1995)
///          "Movie Title" -> None
fn extract_year_from_title(title: &str) -> Option<u16> {
    let start = title.rfind('(')?;
    let end = title.rfind(')')?;
    if start < end {
        return title[start + 1..end].trim().parse::<u16>().ok();
    }
    None
}

/// Split pipe-separated genres, dropping the "(no genres listed)" marker
fn parse_genres(s: &str) -> Vec<String> {
    s.split('|')
        .map(str::trim)
        .filter(|g| !g.is_empty() && *g != NO_GENRES)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_year() {
        assert_eq!(extract_year_from_title("Toy Story (1995)"), Some(1995));
        assert_eq!(extract_year_from_title("Movie Title"), None);
        assert_eq!(extract_year_from_title("Babylon 5 (TV)"), None);
    }

    #[test]
    fn test_parse_genres() {
        assert_eq!(
            parse_genres("Adventure|Animation|Children"),
            vec!["Adventure", "Animation", "Children"]
        );
        assert!(parse_genres(NO_GENRES).is_empty());
        assert!(parse_genres("").is_empty());
    }

    #[test]
    fn test_parse_movies_with_quoted_titles() {
        let csv = "movieId,title,genres\n\
                   1,Toy Story (1995),Adventure|Animation\n\
                   11,\"American President, The (1995)\",Comedy|Drama|Romance\n";

        let movies = parse_movies_from_reader(csv.as_bytes(), "movies.csv").unwrap();

        assert_eq!(movies.len(), 2);
        assert_eq!(movies[1].id, 11);
        assert_eq!(movies[1].title, "American President, The (1995)");
        assert_eq!(movies[1].year, Some(1995));
        assert_eq!(movies[1].genres.len(), 3);
    }

    #[test]
    fn test_parse_movies_keeps_titles_verbatim() {
        let csv = "movieId,title,genres\n1,Heat (1995) ,Action\n";

        let movies = parse_movies_from_reader(csv.as_bytes(), "movies.csv").unwrap();

        assert_eq!(movies[0].title, "Heat (1995) ");
        assert_eq!(movies[0].year, Some(1995));
    }

    #[test]
    fn test_parse_ratings_ignores_extra_and_missing_columns() {
        let with_timestamp = "userId,movieId,rating,timestamp\n1,31,2.5,1260759144\n";
        let ratings = parse_ratings_from_reader(with_timestamp.as_bytes(), "ratings.csv").unwrap();
        assert_eq!(ratings[0].timestamp, 1260759144);
        assert_eq!(ratings[0].rating, 2.5);

        let without_timestamp = "movieId,userId,rating\n31,7,4.0\n";
        let ratings =
            parse_ratings_from_reader(without_timestamp.as_bytes(), "ratings.csv").unwrap();
        assert_eq!(ratings[0].user_id, 7);
        assert_eq!(ratings[0].movie_id, 31);
        assert_eq!(ratings[0].timestamp, 0);
    }

    #[test]
    fn test_parse_error_reports_file_and_line() {
        let csv = "userId,movieId,rating,timestamp\n1,31,2.5,1\n2,not-a-number,3.0,1\n";
        let err = parse_ratings_from_reader(csv.as_bytes(), "ratings.csv").unwrap_err();

        match err {
            DataLoadError::ParseError { file, line, .. } => {
                assert_eq!(file, "ratings.csv");
                assert_eq!(line, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_file() {
        let err = parse_movies(Path::new("does/not/exist/movies.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }
}
