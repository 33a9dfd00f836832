//! Repository tests against a temporary SQLite database.

use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use tempfile::TempDir;

use super::pool::{self, Param};
use super::{init_database, timestamp, PoolSettings, Repository};
use crate::errors::AppError;
use crate::models::{
    IdeaListQuery, NewIdea, SortBy, TechnologyInput, ThemeInput, Timeframe, DEFAULT_RECOMMENDATION_COUNT,
    RECOMMENDATION_COUNT_KEY,
};

async fn setup() -> (Repository, TempDir) {
    setup_with(PoolSettings::default()).await
}

async fn setup_with(settings: PoolSettings) -> (Repository, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.sqlite");
    let pool = init_database(&db_path, &settings)
        .await
        .expect("Failed to init DB");
    (Repository::new(pool), temp_dir)
}

fn theme(name: &str) -> ThemeInput {
    ThemeInput {
        name: name.to_string(),
        description: format!("{} description", name),
        image_url: None,
    }
}

fn new_idea(title: &str, content: &str, username: &str) -> NewIdea {
    NewIdea {
        title: title.to_string(),
        content: content.to_string(),
        username: username.to_string(),
    }
}

async fn count(repo: &Repository, table: &str) -> i64 {
    let rows = pool::query(repo.pool(), &format!("SELECT COUNT(*) AS n FROM {}", table), &[])
        .await
        .unwrap();
    sqlx::Row::get(&rows[0], "n")
}

async fn backdate(repo: &Repository, idea_id: i64, days: i64) {
    sqlx::query("UPDATE ideas SET created_at = ? WHERE id = ?")
        .bind(timestamp(Utc::now() - Duration::days(days)))
        .bind(idea_id)
        .execute(repo.pool())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_idea_links_themes() {
    let (repo, _dir) = setup().await;
    let agriculture = repo.create_theme(&theme("Agriculture")).await.unwrap();
    let climate = repo.create_theme(&theme("Climate")).await.unwrap();

    let idea = repo
        .create_idea(
            &new_idea("Smart Irrigation", "Soil sensors that water on demand", "alice"),
            &[agriculture.id, climate.id],
            &[],
        )
        .await
        .unwrap();

    assert!(idea.idea.id > 0);
    assert_eq!(idea.idea.title, "Smart Irrigation");
    assert_eq!(idea.idea.username, "alice");
    assert_eq!(idea.idea.vote_count, 0);
    let theme_ids: Vec<i64> = idea.themes.iter().map(|t| t.id).collect();
    assert_eq!(theme_ids, vec![agriculture.id, climate.id]);
    assert!(idea.technologies.is_empty());
    assert_eq!(count(&repo, "idea_themes").await, 2);
}

#[tokio::test]
async fn test_create_idea_links_technologies_and_collapses_duplicates() {
    let (repo, _dir) = setup().await;
    let ai = repo
        .create_technology(&TechnologyInput {
            name: "Machine learning".to_string(),
            category: Some("AI".to_string()),
            description: "Models that learn from data".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    let health = repo.create_theme(&theme("Health")).await.unwrap();

    let idea = repo
        .create_idea(
            &new_idea("Triage bot", "Symptom checker", "bob"),
            &[health.id, health.id],
            &[ai.id, ai.id],
        )
        .await
        .unwrap();

    assert_eq!(idea.themes.len(), 1);
    assert_eq!(idea.technologies.len(), 1);
    assert_eq!(idea.technologies[0].category.as_deref(), Some("AI"));

    let summary = repo.get_idea(idea.idea.id).await.unwrap().unwrap();
    assert_eq!(summary.themes[0].name, "Health");
    assert_eq!(summary.technologies[0].name, "Machine learning");
}

#[tokio::test]
async fn test_create_idea_rolls_back_on_unknown_theme() {
    let (repo, _dir) = setup().await;
    let known = repo.create_theme(&theme("Retail")).await.unwrap();

    let result = repo
        .create_idea(&new_idea("Pop-up shop", "Weekend stores", "carol"), &[known.id, 9999], &[])
        .await;

    assert!(matches!(result, Err(AppError::Database(_))));
    assert_eq!(count(&repo, "ideas").await, 0);
    assert_eq!(count(&repo, "idea_themes").await, 0);
}

#[tokio::test]
async fn test_vote_increments_by_one() {
    let (repo, _dir) = setup().await;
    let idea = repo
        .create_idea(&new_idea("Vote me", "Content", "dave"), &[], &[])
        .await
        .unwrap();
    let id = idea.idea.id;

    for expected in 1..=5 {
        assert_eq!(repo.vote_for_idea(id, "10.0.0.1").await.unwrap(), expected);
    }
    assert_eq!(repo.vote_for_idea(id, "10.0.0.2").await.unwrap(), 6);
    assert_eq!(repo.vote_for_idea(id, "10.0.0.2").await.unwrap(), 7);

    assert_eq!(count(&repo, "votes").await, 7);
    let stored = repo.get_idea(id).await.unwrap().unwrap();
    assert_eq!(stored.idea.vote_count, 7);
}

#[tokio::test]
async fn test_vote_unknown_idea_writes_nothing() {
    let (repo, _dir) = setup().await;

    let result = repo.vote_for_idea(42, "10.0.0.1").await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert_eq!(count(&repo, "votes").await, 0);
}

#[tokio::test]
async fn test_list_ideas_sort_orders() {
    let (repo, _dir) = setup().await;
    let mut ids = Vec::new();
    for (i, votes) in [2, 0, 5, 2].iter().enumerate() {
        let idea = repo
            .create_idea(&new_idea(&format!("Idea {}", i), "Body", "erin"), &[], &[])
            .await
            .unwrap();
        for _ in 0..*votes {
            repo.vote_for_idea(idea.idea.id, "voter").await.unwrap();
        }
        ids.push(idea.idea.id);
    }

    let popular = repo
        .list_ideas(&IdeaListQuery {
            sort_by: SortBy::Popular,
            ..Default::default()
        })
        .await
        .unwrap();
    let counts: Vec<i64> = popular.ideas.iter().map(|i| i.idea.vote_count).collect();
    assert_eq!(counts, vec![5, 2, 2, 0]);
    // Equal votes: newest first
    assert_eq!(popular.ideas[1].idea.id, ids[3]);

    let by_votes = repo
        .list_ideas(&IdeaListQuery {
            sort_by: SortBy::Votes,
            ..Default::default()
        })
        .await
        .unwrap();
    // Equal votes: lowest id first
    assert_eq!(by_votes.ideas[1].idea.id, ids[0]);

    let recent = repo.list_ideas(&IdeaListQuery::default()).await.unwrap();
    assert_eq!(recent.total, 4);
    assert!(recent
        .ideas
        .windows(2)
        .all(|w| w[0].idea.created_at >= w[1].idea.created_at));
    assert_eq!(recent.ideas[0].idea.id, ids[3]);
}

#[tokio::test]
async fn test_list_ideas_pagination() {
    let (repo, _dir) = setup().await;
    for i in 0..5 {
        repo.create_idea(&new_idea(&format!("Idea {}", i), "Body", "frank"), &[], &[])
            .await
            .unwrap();
    }

    let page = repo
        .list_ideas(&IdeaListQuery {
            page: 2,
            limit: 2,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.total, 5);
    assert_eq!(page.ideas.len(), 2);
    assert_eq!(page.ideas[0].idea.title, "Idea 2");

    let past_end = repo
        .list_ideas(&IdeaListQuery {
            page: 10,
            limit: 2,
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(past_end.ideas.is_empty());
    assert_eq!(past_end.total, 5);

    let clamped = repo
        .list_ideas(&IdeaListQuery {
            limit: 1000,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(clamped.limit, 100);

    let invalid = repo
        .list_ideas(&IdeaListQuery {
            page: 0,
            ..Default::default()
        })
        .await;
    assert!(matches!(invalid, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_list_ideas_search_case_folding() {
    let (repo, _dir) = setup().await;
    repo.create_idea(&new_idea("Café Éclair", "Pastry by bike", "jules"), &[], &[])
        .await
        .unwrap();

    let search = |term: &str| IdeaListQuery {
        search: term.to_string(),
        ..Default::default()
    };

    // ASCII letters fold
    assert_eq!(repo.list_ideas(&search("CAF")).await.unwrap().total, 1);
    assert_eq!(repo.list_ideas(&search("BIKE")).await.unwrap().total, 1);
    // Non-ASCII letters match as written
    assert_eq!(repo.list_ideas(&search("Éclair")).await.unwrap().total, 1);
    assert_eq!(repo.list_ideas(&search("éclair")).await.unwrap().total, 0);
}

#[tokio::test]
async fn test_list_ideas_rejects_unreachable_page() {
    let (repo, _dir) = setup().await;
    repo.create_idea(&new_idea("Only idea", "Body", "hank"), &[], &[])
        .await
        .unwrap();

    let result = repo
        .list_ideas(&IdeaListQuery {
            page: i64::MAX,
            limit: 12,
            ..Default::default()
        })
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    // Far but representable pages are simply empty
    let far = repo
        .list_ideas(&IdeaListQuery {
            page: 1_000_000,
            limit: 100,
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(far.ideas.is_empty());
    assert_eq!(far.total, 1);
}

#[tokio::test]
async fn test_list_ideas_search_and_theme_filter() {
    let (repo, _dir) = setup().await;
    let energy = repo.create_theme(&theme("Energy")).await.unwrap();
    let food = repo.create_theme(&theme("Food")).await.unwrap();

    repo.create_idea(&new_idea("Solar Roofs", "Panels for rent", "gina"), &[energy.id], &[])
        .await
        .unwrap();
    repo.create_idea(&new_idea("Drone cleaning", "Keeps SOLAR panels clean", "hank"), &[energy.id, food.id], &[])
        .await
        .unwrap();
    repo.create_idea(&new_idea("Bakery", "Bread subscriptions", "solarfan"), &[food.id], &[])
        .await
        .unwrap();
    repo.create_idea(&new_idea("Discounts", "100% organic produce", "ivan"), &[], &[])
        .await
        .unwrap();

    let solar = repo
        .list_ideas(&IdeaListQuery {
            search: "solar".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(solar.total, 3);
    for idea in &solar.ideas {
        let haystack = format!("{} {} {}", idea.idea.title, idea.idea.content, idea.idea.username)
            .to_lowercase();
        assert!(haystack.contains("solar"));
    }

    let percent = repo
        .list_ideas(&IdeaListQuery {
            search: "%".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(percent.total, 1);
    assert_eq!(percent.ideas[0].idea.title, "Discounts");

    let food_only = repo
        .list_ideas(&IdeaListQuery {
            theme: "Food".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(food_only.total, 2);

    let combined = repo
        .list_ideas(&IdeaListQuery {
            search: "solar".to_string(),
            theme: "Food".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(combined.total, 2);
    let drone = combined
        .ideas
        .iter()
        .find(|i| i.idea.title == "Drone cleaning")
        .unwrap();
    // All themes are listed, not only the filtered one
    assert_eq!(drone.themes.len(), 2);
}

#[tokio::test]
async fn test_leaderboard_week_excludes_old_ideas() {
    let (repo, _dir) = setup().await;
    let sports = repo.create_theme(&theme("Sports")).await.unwrap();

    let old = repo
        .create_idea(&new_idea("Old idea", "Body", "jack"), &[], &[])
        .await
        .unwrap();
    let fresh = repo
        .create_idea(&new_idea("Fresh idea", "Body", "kate"), &[sports.id], &[])
        .await
        .unwrap();
    for _ in 0..3 {
        repo.vote_for_idea(old.idea.id, "voter").await.unwrap();
    }
    repo.vote_for_idea(fresh.idea.id, "voter").await.unwrap();
    backdate(&repo, old.idea.id, 10).await;

    let all = repo.get_leaderboard(10, Timeframe::All).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].idea.id, old.idea.id);

    let week = repo.get_leaderboard(10, Timeframe::Week).await.unwrap();
    assert_eq!(week.len(), 1);
    assert_eq!(week[0].idea.id, fresh.idea.id);
    assert_eq!(week[0].themes, vec!["Sports".to_string()]);

    let month = repo.get_leaderboard(10, Timeframe::Month).await.unwrap();
    assert_eq!(month.len(), 2);

    let top_one = repo.get_leaderboard(1, Timeframe::All).await.unwrap();
    assert_eq!(top_one.len(), 1);

    assert!(matches!(
        repo.get_leaderboard(0, Timeframe::All).await,
        Err(AppError::Validation(_))
    ));
}

#[tokio::test]
async fn test_theme_crud_and_cascade() {
    let (repo, _dir) = setup().await;
    let created = repo
        .create_theme(&ThemeInput {
            name: "Mobility".to_string(),
            description: "Getting around".to_string(),
            image_url: Some(String::new()),
        })
        .await
        .unwrap();
    assert_eq!(created.image_url, None);

    let updated = repo
        .update_theme(
            created.id,
            &ThemeInput {
                name: "Urban mobility".to_string(),
                description: "Getting around cities".to_string(),
                image_url: Some("https://img.example/m.png".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Urban mobility");
    assert_eq!(updated.created_at, created.created_at);

    let idea = repo
        .create_idea(&new_idea("Scooters", "Shared scooters", "liam"), &[created.id], &[])
        .await
        .unwrap();

    repo.delete_theme(created.id).await.unwrap();

    let after = repo.get_detailed_idea(idea.idea.id).await.unwrap().unwrap();
    assert!(after.themes.is_empty());
    assert_eq!(count(&repo, "ideas").await, 1);
    assert!(repo.list_themes().await.unwrap().is_empty());

    assert!(matches!(
        repo.delete_theme(created.id).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        repo.update_theme(created.id, &theme("Ghost")).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_themes_by_ids_skips_unknown() {
    let (repo, _dir) = setup().await;
    let a = repo.create_theme(&theme("A")).await.unwrap();
    let b = repo.create_theme(&theme("B")).await.unwrap();

    let found = repo.get_themes_by_ids(&[b.id, 777, a.id]).await.unwrap();
    let names: Vec<&str> = found.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B"]);
    assert!(repo.get_themes_by_ids(&[]).await.unwrap().is_empty());

    let listed = repo.list_themes().await.unwrap();
    assert_eq!(listed[0].id, b.id);
}

#[tokio::test]
async fn test_technology_crud() {
    let (repo, _dir) = setup().await;
    let created = repo
        .create_technology(&TechnologyInput {
            name: "Edge computing".to_string(),
            maturity_level: Some("growing".to_string()),
            description: "Compute near the data".to_string(),
            performance_metrics: Some(serde_json::json!({"latency": "under 10ms"})),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(
        created.performance_metrics,
        Some(serde_json::json!({"latency": "under 10ms"}))
    );

    let updated = repo
        .update_technology(
            created.id,
            &TechnologyInput {
                name: "Edge computing".to_string(),
                description: "Compute close to devices".to_string(),
                performance_metrics: Some(serde_json::json!("fast")),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.maturity_level, None);
    assert_eq!(updated.performance_metrics, Some(serde_json::json!("fast")));

    let found = repo.get_technologies_by_ids(&[created.id]).await.unwrap();
    assert_eq!(found.len(), 1);

    repo.delete_technology(created.id).await.unwrap();
    assert!(repo.list_technologies().await.unwrap().is_empty());
    assert!(matches!(
        repo.delete_technology(created.id).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_detailed_stats() {
    let (repo, _dir) = setup().await;
    let energy = repo.create_theme(&theme("Energy")).await.unwrap();
    let water = repo.create_theme(&theme("Water")).await.unwrap();
    repo.create_theme(&theme("Unused")).await.unwrap();

    let first = repo
        .create_idea(&new_idea("One", "Body", "mia"), &[energy.id, water.id], &[])
        .await
        .unwrap();
    let second = repo
        .create_idea(&new_idea("Two", "Body", "noah"), &[water.id], &[])
        .await
        .unwrap();
    repo.vote_for_idea(first.idea.id, "1.1.1.1").await.unwrap();
    repo.vote_for_idea(first.idea.id, "1.1.1.1").await.unwrap();
    repo.vote_for_idea(second.idea.id, "2.2.2.2").await.unwrap();
    backdate(&repo, second.idea.id, 30).await;

    let stats = repo.get_detailed_stats().await.unwrap();
    assert_eq!(stats.total_ideas, 2);
    assert_eq!(stats.total_themes, 3);
    assert_eq!(stats.total_technologies, 0);
    assert_eq!(stats.total_votes, 3);
    assert_eq!(stats.unique_voters, 2);
    assert_eq!(stats.recent_ideas, 1);
    assert_eq!(stats.recent_votes, 3);

    let top: Vec<(&str, i64)> = stats
        .top_themes
        .iter()
        .map(|t| (t.name.as_str(), t.count))
        .collect();
    assert_eq!(top, vec![("Water", 2), ("Energy", 1)]);
}

#[tokio::test]
async fn test_setting_upsert_keeps_one_row() {
    let (repo, _dir) = setup().await;
    assert_eq!(repo.recommendation_count().await.unwrap(), DEFAULT_RECOMMENDATION_COUNT);

    repo.set_setting(RECOMMENDATION_COUNT_KEY, "3", Some("Themes to recommend"))
        .await
        .unwrap();
    let stored = repo.get_setting(RECOMMENDATION_COUNT_KEY).await.unwrap().unwrap();
    assert_eq!(stored.value, "3");
    assert_eq!(repo.recommendation_count().await.unwrap(), 3);

    let overwritten = repo
        .set_setting(RECOMMENDATION_COUNT_KEY, "4", None)
        .await
        .unwrap();
    assert_eq!(overwritten.value, "4");
    assert_eq!(overwritten.description.as_deref(), Some("Themes to recommend"));
    assert_eq!(count(&repo, "settings").await, 1);

    let by_keys = repo
        .get_settings_by_keys(&[RECOMMENDATION_COUNT_KEY, "missing"])
        .await
        .unwrap();
    assert_eq!(by_keys.len(), 1);
}

#[tokio::test]
async fn test_unparsable_recommendation_count_uses_default() {
    let (repo, _dir) = setup().await;
    repo.set_setting(RECOMMENDATION_COUNT_KEY, "many", None)
        .await
        .unwrap();
    assert_eq!(repo.recommendation_count().await.unwrap(), DEFAULT_RECOMMENDATION_COUNT);

    repo.set_setting(RECOMMENDATION_COUNT_KEY, "0", None).await.unwrap();
    assert_eq!(repo.recommendation_count().await.unwrap(), DEFAULT_RECOMMENDATION_COUNT);
}

#[tokio::test]
async fn test_pool_acquire_timeout() {
    let (repo, _dir) = setup_with(PoolSettings {
        max_connections: 1,
        idle_timeout: StdDuration::from_secs(30),
        acquire_timeout: StdDuration::from_millis(200),
    })
    .await;

    let held = repo.pool().acquire().await.unwrap();

    let started = std::time::Instant::now();
    let result = pool::query(repo.pool(), "SELECT 1", &[]).await;
    assert!(matches!(result, Err(AppError::ConnectionTimeout)));
    assert!(started.elapsed() >= StdDuration::from_millis(150));

    assert!(matches!(repo.list_themes().await, Err(AppError::ConnectionTimeout)));

    // Released connections are reusable
    drop(held);
    let rows = pool::query(repo.pool(), "SELECT ? AS echo", &[Param::from("ok")])
        .await
        .unwrap();
    let echo: String = sqlx::Row::get(&rows[0], "echo");
    assert_eq!(echo, "ok");
}

#[tokio::test]
async fn test_close_drains_pool() {
    let (repo, _dir) = setup().await;
    repo.list_themes().await.unwrap();

    super::close_database(repo.pool()).await;

    assert!(repo.pool().is_closed());
    assert!(repo.list_themes().await.is_err());
}
