//! Emberfall Engine - Demo level run.
//!
//! Plays one scripted level against the shipped templates: spawns the hero,
//! HUD and a spawner per monster type, collects the loot each monster drops,
//! takes the level exit and tears the level down again.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use emberfall_domain::{SpawnerId, Vec3};
use emberfall_engine::infrastructure::settings::AppConfig;
use emberfall_engine::App;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "emberfall_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Emberfall Engine");

    let config = AppConfig::from_env()?;
    tracing::info!(
        start_level = %config.start_level,
        input_mode = ?config.input_mode,
        "Configuration loaded"
    );

    let (app, mut levels) = App::from_config(&config)
        .await
        .context("failed to build application")?;
    let factory = app.entity_factory();

    factory.warm_up().await?;
    let hero = factory.create_hero(Vec3::ZERO).await?;
    let hud = factory.create_hud().await?;

    for (index, monster_type) in app.static_data.monster_types().into_iter().enumerate() {
        let at = Vec3::new(index as f32 * 6.0 + 6.0, 0.0, 4.0);
        let spawner_id = SpawnerId::new(format!("spawner-{index}"))?;
        let spawner = factory
            .create_spawner(spawner_id, at, monster_type.clone())
            .await?;

        let Some(spawn_point) = spawner.first(|c| c.spawn_point.as_ref()) else {
            continue;
        };
        let monster = spawn_point.spawn().await?;
        tracing::info!(
            entity_id = %monster.id(),
            monster_type = %monster_type,
            target = ?hero.id(),
            "Monster entered the level"
        );

        if let Some(loot_spawner) = monster.first(|c| c.loot_spawner.as_ref()) {
            let loot = loot_spawner.spawn_loot().await?;
            if let Some(piece) = loot.first(|c| c.loot_piece.as_ref()) {
                piece.pick_up().await?;
            }
        }
    }

    if let Some(counter) = hud.first(|c| c.loot_counter.as_ref()) {
        tracing::info!(collected = counter.count().await?, "Loot collected");
    }
    for button in hud.all(|c| &c.open_window_buttons[..]) {
        button.click()?;
    }

    let exit = factory.create_level_transfer(Vec3::new(0.0, 0.0, 30.0)).await?;
    if let Some(trigger) = exit.first(|c| c.level_transfer.as_ref()) {
        trigger.trigger()?;
    }
    if let Some(next) = levels.recv().await {
        tracing::info!(scene = %next, "Level exit reached");
    }

    tracing::info!(
        readers = app.registry.reader_count().await,
        writers = app.registry.writer_count().await,
        "Progress participants before teardown"
    );

    factory.cleanup().await;
    tracing::info!(
        readers = app.registry.reader_count().await,
        writers = app.registry.writer_count().await,
        "Level torn down"
    );

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
