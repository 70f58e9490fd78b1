//! Many-to-many association management through a join table

mod common;

use common::{setup_pool, Language, User, LANGUAGES};
use query_action::prelude::*;

struct Fixture {
    users: Action<User>,
    languages: Action<Language>,
    ann: User,
    rust: Language,
    go: Language,
    zig: Language,
}

async fn fixture() -> Fixture {
    let pool = setup_pool().await;
    let users = Action::<User>::new(pool.clone());
    let languages = Action::<Language>::new(pool);

    let mut ann = User::new("ann", 30);
    users.create(&mut ann).await.expect("create user");

    let mut created = vec![Language::new("rust"), Language::new("go"), Language::new("zig")];
    languages
        .batch_create(&mut created, 0)
        .await
        .expect("create languages");
    let zig = created.pop().expect("zig");
    let go = created.pop().expect("go");
    let rust = created.pop().expect("rust");

    Fixture {
        users,
        languages,
        ann,
        rust,
        go,
        zig,
    }
}

fn names(languages: Vec<Language>) -> Vec<String> {
    let mut names: Vec<String> = languages.into_iter().map(|l| l.name).collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_append_and_count() -> Result<()> {
    let f = fixture().await;
    let association = f.users.association(&f.ann)?;
    assert_eq!(association.owner_id(), f.ann.base.id);

    let linked = association
        .append(&LANGUAGES, &[f.rust.clone(), f.go.clone()])
        .await?;
    assert_eq!(linked, 2);
    assert_eq!(association.count::<Language>(&LANGUAGES).await?, 2);

    // appending an existing pair is a no-op
    let linked = association.append(&LANGUAGES, &[f.rust.clone()]).await?;
    assert_eq!(linked, 0);
    assert_eq!(association.count::<Language>(&LANGUAGES).await?, 2);

    let empty: [Language; 0] = [];
    assert_eq!(association.append(&LANGUAGES, &empty).await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_find_loads_linked_targets() -> Result<()> {
    let f = fixture().await;
    let association = f.users.association(&f.ann)?;
    association
        .append(&LANGUAGES, &[f.rust.clone(), f.zig.clone()])
        .await?;

    let linked: Vec<Language> = association.find(&LANGUAGES, &[]).await?;
    assert_eq!(names(linked), vec!["rust", "zig"]);

    let filtered: Vec<Language> = association
        .find(&LANGUAGES, &[where_like_keyword("r%", &["languages.name"])])
        .await?;
    assert_eq!(names(filtered), vec!["rust"]);
    Ok(())
}

#[tokio::test]
async fn test_replace_swaps_the_whole_set() -> Result<()> {
    let f = fixture().await;
    let association = f.users.association(&f.ann)?;
    association
        .append(&LANGUAGES, &[f.rust.clone(), f.go.clone()])
        .await?;

    association
        .replace(&LANGUAGES, &[f.go.clone(), f.zig.clone()])
        .await?;
    let linked: Vec<Language> = association.find(&LANGUAGES, &[]).await?;
    assert_eq!(names(linked), vec!["go", "zig"]);

    let empty: [Language; 0] = [];
    association.replace(&LANGUAGES, &empty).await?;
    assert_eq!(association.count::<Language>(&LANGUAGES).await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_delete_and_clear() -> Result<()> {
    let f = fixture().await;
    let association = f.users.association(&f.ann)?;
    association
        .append(&LANGUAGES, &[f.rust.clone(), f.go.clone(), f.zig.clone()])
        .await?;

    assert_eq!(association.delete(&LANGUAGES, &[f.go.clone()]).await?, 1);
    assert_eq!(association.count::<Language>(&LANGUAGES).await?, 2);

    assert_eq!(association.clear(&LANGUAGES).await?, 2);
    assert_eq!(association.count::<Language>(&LANGUAGES).await?, 0);

    // targets survive; only the links are gone
    assert_eq!(f.languages.count(&[]).await?, 3);
    Ok(())
}

#[tokio::test]
async fn test_soft_deleted_targets_are_not_counted() -> Result<()> {
    let f = fixture().await;
    let association = f.users.association(&f.ann)?;
    association
        .append(&LANGUAGES, &[f.rust.clone(), f.go.clone()])
        .await?;

    f.languages.delete_by_id(f.go.base.id, &[]).await?;
    assert_eq!(association.count::<Language>(&LANGUAGES).await?, 1);

    let trashed: Vec<Language> = association.find(&LANGUAGES, &[with_trashed()]).await?;
    assert_eq!(trashed.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_unsaved_records_are_rejected() -> Result<()> {
    let f = fixture().await;

    let unsaved_owner = User::new("nobody", 1);
    assert!(matches!(
        f.users.association(&unsaved_owner),
        Err(ActionError::MissingPrimaryKey { .. })
    ));

    let association = f.users.association(&f.ann)?;
    let err = association
        .append(&LANGUAGES, &[Language::new("cobol")])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ActionError::MissingPrimaryKey { ref table } if table == "languages"
    ));
    Ok(())
}
