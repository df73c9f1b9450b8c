//! End-to-end provider tests against a real SQLite database.

use cinedex_core::contract::{self, genres, movies};
use cinedex_core::{Database, Error, Provider, ResourceUri, SqlValue, Values};

const TEST_GENRE_NAME: &str = "Family";
const TEST_UPDATE_GENRE_NAME: &str = "Adventure";
const TEST_MOVIE_NAME: &str = "Harry Potter and the Sorcerer's Stone";
const TEST_UPDATE_MOVIE_NAME: &str = "Harry Potter and the Philosopher's Stone";
const TEST_MOVIE_RELEASE_DATE: &str = "2001-11-14";

fn provider() -> Provider {
    cinedex_core::logging::init_test();
    let db = Database::open_in_memory().expect("failed to open database");
    db.migrate().expect("failed to run migrations");
    Provider::new(db)
}

fn genre_values() -> Values {
    let mut values = Values::new();
    values.put_str(genres::COL_NAME, TEST_GENRE_NAME);
    values
}

fn movie_values(genre_id: i64) -> Values {
    let mut values = Values::new();
    values.put_int(movies::COL_GENRE_ID, genre_id);
    values.put_str(movies::COL_NAME, TEST_MOVIE_NAME);
    values.put_str(movies::COL_RELEASE_DATE, TEST_MOVIE_RELEASE_DATE);
    values
}

/// Assert the first row of the result matches every column in the payload.
fn validate_row(rows: &cinedex_core::RowSet, expected: &Values) {
    assert!(!rows.is_empty(), "expected at least one row");
    for (column, value) in expected.iter() {
        assert_eq!(
            rows.get(0, column),
            Some(value),
            "column {} should match",
            column
        );
    }
}

fn insert_genre(provider: &Provider) -> i64 {
    let item = provider
        .insert(&contract::genres_uri(), &genre_values())
        .expect("genre insert failed");
    item.id().expect("genre item uri should carry an id")
}

#[test]
fn test_get_type() {
    let provider = provider();

    assert_eq!(
        provider.get_type(&contract::genres_uri()).unwrap(),
        genres::CONTENT_TYPE
    );
    assert_eq!(
        provider.get_type(&contract::genre_uri(0)).unwrap(),
        genres::CONTENT_ITEM_TYPE
    );
    assert_eq!(
        provider.get_type(&contract::movies_uri()).unwrap(),
        movies::CONTENT_TYPE
    );
    assert_eq!(
        provider.get_type(&contract::movie_uri(0)).unwrap(),
        movies::CONTENT_ITEM_TYPE
    );

    let unknown = ResourceUri::new(contract::AUTHORITY).join("director");
    assert!(matches!(
        provider.get_type(&unknown),
        Err(Error::UnknownUri(_))
    ));
}

#[test]
fn test_insert_read_genre() {
    let provider = provider();

    let genre_id = insert_genre(&provider);
    assert!(genre_id > 0);

    // Query for all rows
    let rows = provider
        .query(&contract::genres_uri(), None, None, &[], None)
        .unwrap();
    assert_eq!(rows.len(), 1);
    validate_row(&rows, &genre_values());

    // Query for the specific row
    let rows = provider
        .query(&contract::genre_uri(genre_id), None, None, &[], None)
        .unwrap();
    assert_eq!(rows.len(), 1);
    validate_row(&rows, &genre_values());
}

#[test]
fn test_insert_read_movie() {
    let provider = provider();
    let genre_id = insert_genre(&provider);

    let movie_item = provider
        .insert(&contract::movies_uri(), &movie_values(genre_id))
        .expect("movie insert failed");
    let movie_id = movie_item.id().expect("movie item uri should carry an id");
    assert!(movie_id > 0);

    let rows = provider
        .query(&contract::movies_uri(), None, None, &[], None)
        .unwrap();
    validate_row(&rows, &movie_values(genre_id));

    let rows = provider
        .query(&contract::movie_uri(movie_id), None, None, &[], None)
        .unwrap();
    validate_row(&rows, &movie_values(genre_id));
}

#[test]
fn test_update_genre() {
    let provider = provider();
    let genre_id = insert_genre(&provider);

    let mut updated = genre_values();
    updated.put_int(genres::COL_ID, genre_id);
    updated.put_str(genres::COL_NAME, TEST_UPDATE_GENRE_NAME);

    let affected = provider
        .update(
            &contract::genres_uri(),
            &updated,
            Some("id = ?"),
            &[SqlValue::Integer(genre_id)],
        )
        .unwrap();
    assert_eq!(affected, 1);

    let rows = provider
        .query(&contract::genre_uri(genre_id), None, None, &[], None)
        .unwrap();
    validate_row(&rows, &updated);
}

#[test]
fn test_update_movie() {
    let provider = provider();
    let genre_id = insert_genre(&provider);

    let movie_item = provider
        .insert(&contract::movies_uri(), &movie_values(genre_id))
        .unwrap();
    let movie_id = movie_item.id().unwrap();

    let mut updated = movie_values(genre_id);
    updated.put_int(movies::COL_ID, movie_id);
    updated.put_str(movies::COL_NAME, TEST_UPDATE_MOVIE_NAME);

    let affected = provider
        .update(
            &contract::movies_uri(),
            &updated,
            Some("id = ?"),
            &[SqlValue::Integer(movie_id)],
        )
        .unwrap();
    assert_eq!(affected, 1);

    // Name changed, release date and genre untouched
    let rows = provider
        .query(&contract::movie_uri(movie_id), None, None, &[], None)
        .unwrap();
    validate_row(&rows, &updated);
    assert_eq!(
        rows.get_text(0, movies::COL_RELEASE_DATE),
        Some(TEST_MOVIE_RELEASE_DATE)
    );
    assert_eq!(rows.get_i64(0, movies::COL_GENRE_ID), Some(genre_id));
}

#[test]
fn test_delete_all_records() {
    let provider = provider();
    let genre_id = insert_genre(&provider);
    provider
        .insert(&contract::movies_uri(), &movie_values(genre_id))
        .unwrap();

    // Movies first: genres are referenced by movies
    provider.delete(&contract::movies_uri(), None, &[]).unwrap();
    provider.delete(&contract::genres_uri(), None, &[]).unwrap();

    let rows = provider
        .query(&contract::movies_uri(), None, None, &[], None)
        .unwrap();
    assert_eq!(rows.len(), 0);

    let rows = provider
        .query(&contract::genres_uri(), None, None, &[], None)
        .unwrap();
    assert_eq!(rows.len(), 0);
}

#[test]
fn test_query_with_projection_and_order() {
    let provider = provider();

    let mut family = Values::new();
    family.put_str(genres::COL_NAME, "Family");
    let mut adventure = Values::new();
    adventure.put_str(genres::COL_NAME, "Adventure");

    provider.insert(&contract::genres_uri(), &family).unwrap();
    provider
        .insert(&contract::genres_uri(), &adventure)
        .unwrap();

    let rows = provider
        .query(
            &contract::genres_uri(),
            Some(&[genres::COL_NAME]),
            None,
            &[],
            Some("name ASC"),
        )
        .unwrap();
    assert_eq!(rows.columns().to_vec(), vec!["name".to_string()]);
    assert_eq!(rows.get_text(0, genres::COL_NAME), Some("Adventure"));
    assert_eq!(rows.get_text(1, genres::COL_NAME), Some("Family"));
}

#[test]
fn test_item_query_ignores_supplied_filter() {
    let provider = provider();
    let genre_id = insert_genre(&provider);

    // The filter would match nothing; the item path wins
    let rows = provider
        .query(
            &contract::genre_uri(genre_id),
            None,
            Some("name = ?"),
            &[SqlValue::Text("No Such Genre".to_string())],
            None,
        )
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows.get_i64(0, genres::COL_ID), Some(genre_id));
}

#[test]
fn test_movie_requires_existing_genre() {
    let provider = provider();

    let orphan = movie_values(999);
    let result = provider.insert(&contract::movies_uri(), &orphan);
    assert!(matches!(result, Err(Error::Database(_))));
}

#[test]
fn test_duplicate_genre_name_rejected() {
    let provider = provider();
    insert_genre(&provider);

    let result = provider.insert(&contract::genres_uri(), &genre_values());
    assert!(matches!(result, Err(Error::Database(_))));
}

#[test]
fn test_typed_round_trip() {
    use chrono::NaiveDate;
    use cinedex_core::{Movie, NewMovie};

    let provider = provider();
    let genre_id = insert_genre(&provider);

    let payload = NewMovie::new(
        TEST_MOVIE_NAME,
        NaiveDate::from_ymd_opt(2001, 11, 14).unwrap(),
        genre_id,
    );
    let item = provider
        .insert(&contract::movies_uri(), &payload.to_values())
        .unwrap();

    let rows = provider.query(&item, None, None, &[], None).unwrap();
    let movie = Movie::from_row(&rows, 0).unwrap();
    assert_eq!(movie.id, item.id().unwrap());
    assert_eq!(movie.name, TEST_MOVIE_NAME);
    assert_eq!(movie.release_date.to_string(), TEST_MOVIE_RELEASE_DATE);
    assert_eq!(movie.genre_id, genre_id);
}

/// The scenario from the product brief: insert the Family genre and the
/// first Harry Potter movie, then fix the title to the UK release name.
#[test]
fn test_harry_potter_rename() {
    let provider = provider();

    let genre_id = insert_genre(&provider);
    assert!(genre_id > 0);

    let movie_item = provider
        .insert(&contract::movies_uri(), &movie_values(genre_id))
        .unwrap();
    let movie_id = movie_item.id().unwrap();
    assert!(movie_id > 0);

    let mut rename = Values::new();
    rename.put_str(movies::COL_NAME, TEST_UPDATE_MOVIE_NAME);
    provider
        .update(
            &contract::movies_uri(),
            &rename,
            Some("id = ?"),
            &[SqlValue::Integer(movie_id)],
        )
        .unwrap();

    let rows = provider
        .query(&contract::movie_uri(movie_id), None, None, &[], None)
        .unwrap();
    assert_eq!(
        rows.get_text(0, movies::COL_NAME),
        Some(TEST_UPDATE_MOVIE_NAME)
    );
    assert_eq!(
        rows.get_text(0, movies::COL_RELEASE_DATE),
        Some(TEST_MOVIE_RELEASE_DATE)
    );
    assert_eq!(rows.get_i64(0, movies::COL_GENRE_ID), Some(genre_id));
}

#[test]
fn test_file_backed_database() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(&dir.path().join("catalog.db")).unwrap();
    db.migrate().unwrap();
    let provider = Provider::new(db);

    let genre_id = insert_genre(&provider);
    let rows = provider
        .query(&contract::genre_uri(genre_id), None, None, &[], None)
        .unwrap();
    assert_eq!(rows.len(), 1);
}
