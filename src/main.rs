use std::fs::File;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use bevy::prelude::*;
use clap::Parser;

use counting_galaxy::activity::{
    AnalyticsEvent, AnalyticsSink, JsonLinesAnalytics, LogNarrator, Narrator,
};
use counting_galaxy::{ActivitySeed, CountingActivity, GameConfig, GamePlugin};

#[derive(Parser, Debug)]
#[command(about = "Counting Galaxy: tap the numbers in order", version)]
struct Args {
    /// Base RON config.
    #[arg(long, default_value = "assets/config/game.ron")]
    config: PathBuf,
    /// Extra RON files merged over the base, in order.
    #[arg(long)]
    overlay: Vec<PathBuf>,
    /// Fix the RNG seed for a reproducible layout.
    #[arg(long)]
    seed: Option<u64>,
    /// Completed-levels count used to pick the difficulty.
    #[arg(long)]
    level: Option<u32>,
    /// Append analytics events as JSON lines to this file.
    #[arg(long)]
    analytics_log: Option<PathBuf>,
}

/// Shares one JSON-lines file across sessions.
struct SharedJsonLines(Arc<Mutex<JsonLinesAnalytics<File>>>);

impl AnalyticsSink for SharedJsonLines {
    fn track(&mut self, event: AnalyticsEvent) {
        if let Ok(mut sink) = self.0.lock() {
            sink.track(event);
        }
    }
}

fn main() {
    let args = Args::parse();
    let mut paths = vec![args.config.clone()];
    paths.extend(args.overlay.iter().cloned());
    let (mut cfg, used, errors) = GameConfig::load_layered(&paths);
    if let Some(level) = args.level {
        cfg.activity.level = level;
    }

    let mut app = App::new();
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: cfg.window.title.clone(),
            resolution: (cfg.window.width, cfg.window.height).into(),
            resizable: true,
            ..default()
        }),
        ..default()
    }));
    for e in &errors {
        warn!(target: "config", "{e}");
    }
    if used.is_empty() {
        warn!(target: "config", "no files loaded; using defaults");
    }
    for w in cfg.validate() {
        warn!(target: "config", "{w}");
    }
    if let Some(seed) = args.seed {
        app.insert_resource(ActivitySeed(seed));
    }
    if let Some(path) = &args.analytics_log {
        match JsonLinesAnalytics::append_to(path) {
            Ok(sink) => {
                let shared = Arc::new(Mutex::new(sink));
                let seed = args.seed.unwrap_or_else(rand::random);
                app.insert_resource(CountingActivity::new(
                    &cfg,
                    seed,
                    Box::new(move || {
                        (
                            Box::new(SharedJsonLines(shared.clone())) as Box<dyn AnalyticsSink>,
                            Box::new(LogNarrator) as Box<dyn Narrator>,
                        )
                    }),
                ));
            }
            Err(e) => warn!(target: "analytics", "cannot open {}: {e}", path.display()),
        }
    }
    app.insert_resource(cfg).add_plugins(GamePlugin).run();
}
