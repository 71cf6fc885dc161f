// src/main.rs

use anyhow::{Context, Result};
use scene_vqa::{answer, quick_summary, Config, LlmSummarizer, MemoryDataset, SceneCache, Summarizer};
use tracing::{info, warn};

fn main() -> Result<()> {
    let config_path =
        std::env::var("SCENE_VQA_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());
    let mut config = Config::load(&config_path)?;
    if let Ok(url) = std::env::var("SUMMARY_API_URL") {
        config.summary.server_url = url;
    }

    tracing_subscriber::fmt()
        .with_env_filter(config.log_filter())
        .init();

    info!("Scene VQA starting (config: {})", config_path);

    let dataset = MemoryDataset::load(&config.dataset.path)?;
    let mut cache = SceneCache::new();
    let scene = cache
        .get_or_build(&dataset, config.scene.index)
        .with_context(|| format!("Failed to build scene {}", config.scene.index))?;

    info!(
        "Scene {} '{}' of '{}': {} samples, {} instances",
        scene.scene_index(),
        scene.scene_name(),
        dataset.name(),
        scene.ego_track().len(),
        scene.instances().len()
    );

    // A question on the command line replaces the prebuilt list.
    let cli_question = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    let questions = if cli_question.trim().is_empty() {
        config.scene.questions.clone()
    } else {
        vec![cli_question]
    };

    for question in &questions {
        println!("Q: {}", question);
        println!("A: {}", answer(&scene, question));
    }

    let summarizer = if config.summary.enabled {
        match LlmSummarizer::new(&config.summary, std::env::var("OPENAI_API_KEY").ok()) {
            Ok(s) => Some(s),
            Err(e) => {
                warn!("Summary client unavailable: {:#}", e);
                None
            }
        }
    } else {
        None
    };

    let summary = quick_summary(
        &scene,
        summarizer.as_ref().map(|s| s as &dyn Summarizer),
        config.summary.max_display_chars,
    );
    println!("Scene summary: {}", summary);

    let snapshot = scene.snapshot(config.scene.snapshot_objects);
    for obj in &snapshot.objects {
        info!(
            "Snapshot: {} ({}) with {} points",
            obj.category_name,
            obj.instance_token,
            obj.path.len()
        );
    }

    Ok(())
}
