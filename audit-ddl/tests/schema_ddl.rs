//! Integration tests for building a schema and rendering it per platform.

use audit_ddl::{ColumnOptions, ColumnType, DdlError, Platform, Schema};

fn blog_schema() -> Schema {
    let mut schema = Schema::new();

    let posts = schema.create_table("posts").expect("create posts");
    posts
        .add_column(
            "id",
            ColumnType::Integer,
            ColumnOptions {
                autoincrement: true,
                ..ColumnOptions::default()
            },
        )
        .expect("add id");
    posts
        .add_column("title", ColumnType::String, ColumnOptions::with_length(120))
        .expect("add title");
    posts
        .add_column(
            "state",
            ColumnType::enumeration(["draft", "published"]),
            ColumnOptions::default(),
        )
        .expect("add state");
    posts.set_primary_key(&["id"]).expect("pk");

    let tags = schema.create_table("posts_tags").expect("create join table");
    tags.add_column("post_id", ColumnType::Integer, ColumnOptions::default())
        .expect("add post_id");
    tags.add_column("tag_id", ColumnType::Integer, ColumnOptions::default())
        .expect("add tag_id");
    tags.set_primary_key(&["post_id", "tag_id"]).expect("pk");
    tags.add_foreign_key_constraint("posts", &["post_id"], &["id"], "fk_posts_tags_post")
        .expect("fk");

    schema
}

#[test]
fn mysql_renders_native_enum_and_deferred_constraints() {
    let sql = Platform::Mysql.create_schema_sql(&blog_schema());
    assert_eq!(sql.len(), 3);
    assert!(sql[0].contains("`state` ENUM('draft', 'published') NOT NULL"));
    assert!(sql[0].contains("`title` VARCHAR(120) NOT NULL"));
    assert!(sql[1].contains("PRIMARY KEY(`post_id`, `tag_id`)"));
    assert!(sql[2].starts_with("ALTER TABLE `posts_tags` ADD CONSTRAINT `fk_posts_tags_post`"));
}

#[test]
fn sqlite_renders_enum_as_varchar_with_inline_constraints() {
    let sql = Platform::Sqlite.create_schema_sql(&blog_schema());
    assert_eq!(sql.len(), 2);
    assert!(sql[0].contains("\"state\" VARCHAR(255) NOT NULL"));
    assert!(!sql[0].contains("ENUM"));
    assert!(sql[1].contains("FOREIGN KEY (\"post_id\") REFERENCES \"posts\" (\"id\")"));
}

#[test]
fn every_reference_is_validated() {
    let mut schema = blog_schema();
    let table = schema.get_table_mut("POSTS").expect("lookup ignores case");

    assert!(matches!(
        table.set_primary_key(&["id", "missing"]),
        Err(DdlError::ColumnNotFound { .. })
    ));
    assert!(matches!(
        table.add_index(&["nope"], "idx"),
        Err(DdlError::ColumnNotFound { .. })
    ));
    assert!(matches!(
        table.add_column("Title", ColumnType::Text, ColumnOptions::default()),
        Err(DdlError::ColumnAlreadyExists { .. })
    ));
    assert_eq!(
        table.primary_key_columns(),
        vec!["id".to_owned()],
        "failed key update leaves the old key in place"
    );
}
