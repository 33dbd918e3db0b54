use rusqlite::types::{ToSql, ToSqlOutput};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

/// A request value bound as-is, whatever its JSON type.
///
/// Column affinity does the conversion: `"1"` lands in an INTEGER column
/// as 1, and `1` lands in a TEXT column as `"1"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Real(f64),
    Bool(bool),
    Text(String),
}

impl ToSql for Scalar {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Scalar::Int(i) => ToSqlOutput::from(*i),
            Scalar::Real(f) => ToSqlOutput::from(*f),
            Scalar::Bool(b) => ToSqlOutput::from(*b),
            Scalar::Text(s) => ToSqlOutput::from(s.as_str()),
        })
    }
}

/// A user as returned to clients. The password hash never leaves the database layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub user_image: Option<String>,
}

/// A full `posts` row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub title: Option<String>,
    pub short_desc: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
    pub user_id: i64,
    pub status: Option<String>,
}

impl Post {
    pub const COLUMNS: &'static str =
        "id, title, shortDesc, description, image, category, date, userId, status";

    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            short_desc: row.get(2)?,
            description: row.get(3)?,
            image: row.get(4)?,
            category: row.get(5)?,
            date: row.get(6)?,
            user_id: row.get(7)?,
            status: row.get(8)?,
        })
    }
}

/// Listing card: a post joined with its author's name and avatar.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub username: String,
    pub user_image: Option<String>,
    pub title: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
    pub short_desc: Option<String>,
    pub id: i64,
}

impl PostSummary {
    pub const SELECT: &'static str = "SELECT u.username, u.userImage, p.title, p.image, \
         p.category, p.date, p.shortDesc, p.id FROM users u JOIN posts p ON u.id = p.userId";

    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            username: row.get(0)?,
            user_image: row.get(1)?,
            title: row.get(2)?,
            image: row.get(3)?,
            category: row.get(4)?,
            date: row.get(5)?,
            short_desc: row.get(6)?,
            id: row.get(7)?,
        })
    }
}

/// Single-post page: the summary plus the full description.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    pub username: String,
    pub user_image: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
    pub short_desc: Option<String>,
    pub id: i64,
}

impl PostDetail {
    pub const SELECT: &'static str = "SELECT u.username, u.userImage, p.title, p.description, \
         p.image, p.category, p.date, p.shortDesc, p.id FROM users u JOIN posts p ON u.id = p.userId";

    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            username: row.get(0)?,
            user_image: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            image: row.get(4)?,
            category: row.get(5)?,
            date: row.get(6)?,
            short_desc: row.get(7)?,
            id: row.get(8)?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub comment_user: Option<String>,
    pub comment_user_email: Option<String>,
    pub comment_user_message: Option<String>,
    pub comment_date: Option<String>,
}

impl Comment {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            comment_user: row.get(0)?,
            comment_user_email: row.get(1)?,
            comment_user_message: row.get(2)?,
            comment_date: row.get(3)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_serializes_with_camel_case_keys() {
        let summary = PostSummary {
            username: "alice".into(),
            user_image: Some("/uploads/1-a.png".into()),
            title: Some("Hello".into()),
            image: None,
            category: Some("tech".into()),
            date: None,
            short_desc: Some("short".into()),
            id: 7,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["userImage"], "/uploads/1-a.png");
        assert_eq!(json["shortDesc"], "short");
        assert_eq!(json["id"], 7);
        assert!(json.get("description").is_none());
    }

    #[test]
    fn scalar_accepts_any_json_scalar() {
        let values: Vec<Option<Scalar>> =
            serde_json::from_str(r#"[1, "1", 1.5, true, null]"#).unwrap();
        assert_eq!(
            values,
            vec![
                Some(Scalar::Int(1)),
                Some(Scalar::Text("1".into())),
                Some(Scalar::Real(1.5)),
                Some(Scalar::Bool(true)),
                None,
            ]
        );
    }

    #[test]
    fn scalar_binding_follows_column_affinity() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (n INTEGER, s TEXT)").unwrap();
        conn.execute(
            "INSERT INTO t (n, s) VALUES (?1, ?2)",
            rusqlite::params![Scalar::Text("7".into()), Scalar::Int(1)],
        )
        .unwrap();

        let (n, s): (i64, String) = conn
            .query_row("SELECT n, s FROM t", [], |row| Ok((row.get(0)?, row.get(1)?)))
            .unwrap();
        assert_eq!(n, 7);
        assert_eq!(s, "1");
    }

    #[test]
    fn user_has_no_password_field() {
        let user = User {
            id: 1,
            username: "alice".into(),
            email: "alice@example.com".into(),
            user_image: None,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("userImage").unwrap().is_null());
    }
}
