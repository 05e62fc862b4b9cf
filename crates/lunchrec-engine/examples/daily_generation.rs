//! Seeds a small in-process population, runs one generation, and prints the
//! recommendations served for the first workday.

use lunchrec_core::{seoul_today, workdays_in_window, EngineConfig, InMemoryDirectory, UserProfile};
use lunchrec_engine::RecommendationEngine;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let dir = Arc::new(InMemoryDirectory::new());
    let roster = [
        ("1", "김철수", "한식,중식", "맛집 탐방,새로운 메뉴 도전"),
        ("2", "이영희", "양식,일식", "건강한 음식,다이어트"),
        ("3", "박민수", "한식,분식", "빠른 식사,가성비"),
        ("4", "최지은", "양식,한식", "다양한 음식,새로운 메뉴 도전"),
        ("5", "정현우", "중식,한식", "맛집 탐방,분위기 좋은 곳"),
        ("6", "한소영", "일식,양식", "건강한 음식,다이어트"),
    ];
    for (id, nickname, genres, styles) in roster {
        dir.add_user(
            UserProfile::new(id)
                .with_nickname(nickname)
                .with_cuisine_genres(genres)
                .with_lunch_styles(styles),
        );
        dir.set_lunch_style(id, styles.split(',').next().unwrap_or_default());
    }
    dir.add_party(seoul_today().to_string(), "5", ["6"]);

    let engine = RecommendationEngine::new(
        dir.clone(),
        dir.clone(),
        dir.clone(),
        dir.clone(),
        EngineConfig::default(),
    );
    engine.trigger_generation().await?;

    let first_workday = workdays_in_window(seoul_today(), 30)[0];
    for (id, nickname, _, _) in roster {
        let entries = engine.lookup(id, first_workday);
        println!("{nickname} ({id}): {} groups for {first_workday}", entries.len());
        for entry in entries.iter().take(3) {
            let members: Vec<&str> = entry
                .members
                .iter()
                .map(|m| m.display_name.as_str())
                .collect();
            println!("  {:?}", members);
        }
    }

    Ok(())
}
