// Runs against a live PostgreSQL only when DATABASE_URL is set
use anyhow::Result;

use rock_api::config::AppConfig;
use rock_api::database::models::{DeleteOutcome, NewRock, NewUser};
use rock_api::database::{schema, DatabaseManager, PgStore, RecordStore, StoreError};

async fn store() -> Result<Option<PgStore>> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping PostgreSQL store test");
        return Ok(None);
    };

    let mut config = AppConfig::development().database;
    config.url = Some(url);
    let pool = DatabaseManager::connect(&config).await?;
    schema::migrate(&pool).await?;
    Ok(Some(PgStore::new(pool)))
}

fn new_user(prefix: &str) -> NewUser {
    NewUser {
        username: format!("{}_{}", prefix, uuid::Uuid::new_v4().simple()),
        first_name: prefix.to_string(),
        last_name: "Stone".to_string(),
        password_hash: "salt$hash".to_string(),
    }
}

#[tokio::test]
async fn postgres_store_enforces_type_and_owner() -> Result<()> {
    let Some(store) = store().await? else {
        return Ok(());
    };

    let igneous = store
        .list_types()
        .await?
        .into_iter()
        .find(|t| t.label == "Igneous")
        .expect("seeded type");

    let a = store.create_user(new_user("a")).await?;
    let b = store.create_user(new_user("b")).await?;

    let duplicate = NewUser { username: a.username.clone(), ..new_user("a") };
    assert!(matches!(store.create_user(duplicate).await, Err(StoreError::Conflict(_))));

    let missing_type = NewRock { name: "Ghost".to_string(), weight: 1.0, type_id: -1, user_id: a.id };
    assert!(store.insert_rock(missing_type).await?.is_none());

    let rock = store
        .insert_rock(NewRock { name: "Obsidian".to_string(), weight: 5.0, type_id: igneous.id, user_id: a.id })
        .await?
        .expect("inserted");
    assert_eq!(rock.type_label, "Igneous");
    assert_eq!(rock.first_name, "a");

    let owned = store.list_rocks(Some(a.id)).await?;
    assert_eq!(owned.iter().map(|r| r.id).collect::<Vec<_>>(), vec![rock.id]);
    assert!(store.list_rocks(None).await?.iter().any(|r| r.id == rock.id));

    assert_eq!(store.delete_rock_owned(rock.id, b.id).await?, DeleteOutcome::NotOwned);
    assert!(store.find_rock(rock.id).await?.is_some());
    assert_eq!(store.delete_rock_owned(rock.id, a.id).await?, DeleteOutcome::Deleted);
    assert_eq!(store.delete_rock_owned(rock.id, a.id).await?, DeleteOutcome::Missing);
    assert!(store.find_rock(rock.id).await?.is_none());

    Ok(())
}
