//! REST path and query-string construction.
//!
//! Every function here is pure. Path segments, query keys and query values are
//! percent-encoded with the form-urlencoded byte set, except that a space is
//! written as `%20` so the same text decodes identically as a path segment or
//! as a form value.

use thiserror::Error;
use url::form_urlencoded;

/// Name of the query parameter carrying the database selector.
pub const DATABASE_PARAM: &str = "db";

/// A required path component was blank or a `.`/`..` dot segment
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{what} must not be blank, \".\" or \"..\"")]
pub struct InvalidArgument {
    pub what: &'static str,
}

/// Ordered query parameters. Entries whose value is `None` are never rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: Vec<(String, Option<String>)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter, or overwrite the value of an existing key in place.
    pub fn insert(&mut self, key: impl Into<String>, value: Option<impl Into<String>>) {
        let key = key.into();
        let value = value.map(Into::into);
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, Some(value));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_deref()))
    }
}

/// `/collections`
pub fn collections_path() -> String {
    "/collections".to_string()
}

/// `/collections/{collection}/documents`
pub fn documents_path(collection: &str) -> Result<String, InvalidArgument> {
    let collection = require(collection, "collection name")?;
    Ok(format!("/collections/{}/documents", encode(collection)))
}

/// `/collections/{collection}/documents/{id}`
pub fn single_document_path(collection: &str, id: &str) -> Result<String, InvalidArgument> {
    let base = documents_path(collection)?;
    let id = require(id, "document id")?;
    Ok(format!("{}/{}", base, encode(id)))
}

pub fn exists_path(collection: &str) -> Result<String, InvalidArgument> {
    Ok(documents_path(collection)? + "/exists")
}

pub fn duplicate_path(collection: &str) -> Result<String, InvalidArgument> {
    Ok(documents_path(collection)? + "/has-duplicate")
}

pub fn find_path(collection: &str) -> Result<String, InvalidArgument> {
    Ok(documents_path(collection)? + "/find")
}

/// Render `?k1=v1&k2=v2`. Returns an empty string when nothing is rendered.
pub fn build_query(params: &QueryParams) -> String {
    let rendered: Vec<String> = params
        .iter()
        .filter_map(|(key, value)| value.map(|v| format!("{}={}", encode(key), encode(v))))
        .collect();

    if rendered.is_empty() {
        return String::new();
    }
    format!("?{}", rendered.join("&"))
}

/// `?db=..&limit=..&field=..&value=..`
pub fn search_query(limit: usize, field: &str, value: &str, database: Option<&str>) -> String {
    let params = QueryParams::new()
        .with("limit", limit.to_string())
        .with("field", field)
        .with("value", value);
    build_query(&with_database_param(params, database))
}

/// `?db=..&field=..&value=..`
pub fn field_query(field: &str, value: &str, database: Option<&str>) -> String {
    let params = QueryParams::new().with("field", field).with("value", value);
    build_query(&with_database_param(params, database))
}

/// `?db=..&limit=..&skip=..`
pub fn pagination_query(limit: usize, skip: usize, database: Option<&str>) -> String {
    let params = QueryParams::new()
        .with("limit", limit.to_string())
        .with("skip", skip.to_string());
    build_query(&with_database_param(params, database))
}

/// Append `?db=..` to a path that carries no query string of its own.
pub fn with_database(path: &str, database: Option<&str>) -> String {
    let query = build_query(&with_database_param(QueryParams::new(), database));
    format!("{}{}", path, query)
}

/// Put the selector in front of `params`. Blank selectors leave `params` untouched.
fn with_database_param(params: QueryParams, database: Option<&str>) -> QueryParams {
    let Some(database) = database.filter(|db| !db.trim().is_empty()) else {
        return params;
    };

    let mut all = QueryParams::new().with(DATABASE_PARAM, database);
    for (key, value) in params.entries {
        all.insert(key, value);
    }
    all
}

fn encode(value: &str) -> String {
    // byte_serialize turns ' ' into '+' and a literal '+' into "%2B"
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

fn require<'a>(value: &'a str, what: &'static str) -> Result<&'a str, InvalidArgument> {
    // URL parsers collapse dot segments, encoded or not
    if value.trim().is_empty() || value == "." || value == ".." {
        return Err(InvalidArgument { what });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(segment: &str) -> String {
        form_urlencoded::parse(format!("v={}", segment).as_bytes())
            .next()
            .map(|(_, v)| v.into_owned())
            .unwrap_or_default()
    }

    #[test]
    fn test_fixed_paths() {
        assert_eq!(collections_path(), "/collections");
        assert_eq!(
            documents_path("users").unwrap(),
            "/collections/users/documents"
        );
        assert_eq!(
            exists_path("users").unwrap(),
            "/collections/users/documents/exists"
        );
        assert_eq!(
            duplicate_path("users").unwrap(),
            "/collections/users/documents/has-duplicate"
        );
        assert_eq!(
            find_path("users").unwrap(),
            "/collections/users/documents/find"
        );
    }

    #[test]
    fn test_blank_components_rejected() {
        assert_eq!(
            documents_path("").unwrap_err(),
            InvalidArgument {
                what: "collection name"
            }
        );
        assert!(documents_path("   ").is_err());
        assert_eq!(
            single_document_path("users", " \t").unwrap_err(),
            InvalidArgument { what: "document id" }
        );
        assert!(exists_path("").is_err());
        assert!(duplicate_path("").is_err());
    }

    #[test]
    fn test_dot_segments_rejected() {
        for dots in [".", ".."] {
            assert_eq!(
                documents_path(dots).unwrap_err(),
                InvalidArgument {
                    what: "collection name"
                }
            );
            assert_eq!(
                single_document_path("users", dots).unwrap_err(),
                InvalidArgument { what: "document id" }
            );
            assert!(find_path(dots).is_err());
        }

        // only whole dot segments are special
        assert_eq!(
            single_document_path("users", "...").unwrap(),
            "/collections/users/documents/..."
        );
        assert_eq!(
            single_document_path("v1.2", ".hidden").unwrap(),
            "/collections/v1.2/documents/.hidden"
        );
    }

    #[test]
    fn test_single_document_path_round_trips_reserved_characters() {
        let cases = [
            ("a/b", "x?y"),
            ("with space", "id&k=v"),
            ("100%", "plus+sign"),
            ("café", "日本語"),
            ("emoji 🚀", "#hash"),
        ];

        for (collection, id) in cases {
            let path = single_document_path(collection, id).unwrap();
            let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
            assert_eq!(segments.len(), 4, "unexpected path {}", path);
            assert_eq!(segments[0], "collections");
            assert_eq!(segments[2], "documents");
            assert_eq!(decode(segments[1]), collection);
            assert_eq!(decode(segments[3]), id);
            assert!(!path.contains(' '));
        }
    }

    #[test]
    fn test_space_is_percent_encoded() {
        assert_eq!(
            documents_path("my coll").unwrap(),
            "/collections/my%20coll/documents"
        );
        assert_eq!(
            field_query("name", "a b+c", None),
            "?field=name&value=a%20b%2Bc"
        );
    }

    #[test]
    fn test_build_query_empty() {
        assert_eq!(build_query(&QueryParams::new()), "");

        let mut params = QueryParams::new();
        params.insert("limit", None::<String>);
        params.insert("field", None::<String>);
        assert_eq!(build_query(&params), "");
    }

    #[test]
    fn test_build_query_skips_unset_values() {
        let mut params = QueryParams::new();
        params.insert("a", Some("1"));
        params.insert("b", None::<String>);
        params.insert("c", Some("x=y&z"));
        assert_eq!(build_query(&params), "?a=1&c=x%3Dy%26z");
    }

    #[test]
    fn test_search_query_puts_database_first() {
        assert_eq!(
            search_query(50, "name", "Alice", Some("mydb")),
            "?db=mydb&limit=50&field=name&value=Alice"
        );
        assert_eq!(
            search_query(50, "name", "Alice", None),
            "?limit=50&field=name&value=Alice"
        );
    }

    #[test]
    fn test_blank_database_is_omitted() {
        assert_eq!(pagination_query(20, 40, Some("  ")), "?limit=20&skip=40");
        assert_eq!(field_query("f", "v", Some("")), "?field=f&value=v");
        assert_eq!(with_database("/collections", Some(" ")), "/collections");
        assert_eq!(with_database("/collections", None), "/collections");
    }

    #[test]
    fn test_pagination_and_field_queries_with_database() {
        assert_eq!(
            pagination_query(50, 0, Some("shop")),
            "?db=shop&limit=50&skip=0"
        );
        assert_eq!(
            field_query("email", "a@b.c", Some("shop")),
            "?db=shop&field=email&value=a%40b.c"
        );
        assert_eq!(
            with_database("/collections", Some("my db")),
            "/collections?db=my%20db"
        );
    }

    #[test]
    fn test_query_values_round_trip() {
        let value = "k=v&x/y?z% ü";
        let query = field_query("some field", value, Some("db/1"));
        let pairs: Vec<(String, String)> = form_urlencoded::parse(query[1..].as_bytes())
            .into_owned()
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("db".to_string(), "db/1".to_string()),
                ("field".to_string(), "some field".to_string()),
                ("value".to_string(), value.to_string()),
            ]
        );
    }

    #[test]
    fn test_insert_overwrites_in_place() {
        let mut params = QueryParams::new().with("a", "1").with("b", "2");
        params.insert("a", Some("3"));
        assert_eq!(build_query(&params), "?a=3&b=2");
    }
}
