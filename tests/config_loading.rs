use std::io::Write;

use counting_galaxy::activity::DifficultyRating;
use counting_galaxy::core::config::GameConfig;

#[test]
fn shipped_config_parses_cleanly() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/config/game.ron");
    let cfg = GameConfig::load_from_file(path).expect("shipped config parses");
    let warnings = cfg.validate();
    assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    assert_eq!(cfg.activity.id, "CountingGalaxy");
    assert!(cfg.activity.difficulties.len() >= 2);
    assert_eq!(cfg.activity.difficulties[1].rating, DifficultyRating::Easy);
    assert!(cfg.activity.skins.iter().any(|s| s.name == "planet"));
}

#[test]
fn partial_file_keeps_defaults() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    write!(
        f,
        r#"(
            counting: (spin_count: 1, x_radius: (min: 2.0, max: 5.0)),
            activity: (orderings: [["planet"]]),
        )"#
    )
    .unwrap();
    let cfg = GameConfig::load_from_file(f.path()).unwrap();
    let defaults = GameConfig::default();
    assert_eq!(cfg.counting.spin_count, 1);
    assert_eq!(cfg.counting.x_radius.min, 2.0);
    assert_eq!(cfg.counting.y_radius, defaults.counting.y_radius);
    assert_eq!(cfg.counting.scatter_duration, defaults.counting.scatter_duration);
    assert_eq!(cfg.activity.orderings, vec![vec!["planet".to_string()]]);
    assert_eq!(cfg.activity.skins, defaults.activity.skins);
    assert_eq!(cfg.window, defaults.window);
}

#[test]
fn broken_file_reports_path() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    write!(f, "(counting: (spin_count: \"many\"))").unwrap();
    let err = GameConfig::load_from_file(f.path()).unwrap_err();
    assert!(format!("{err:#}").contains(&f.path().display().to_string()));
    let (cfg, msg) = GameConfig::load_or_default(f.path());
    assert!(msg.is_some());
    assert_eq!(cfg, GameConfig::default());
}

#[test]
fn layered_overlay_replaces_lists_and_merges_structs() {
    let mut base = tempfile::NamedTempFile::new().unwrap();
    let mut overlay = tempfile::NamedTempFile::new().unwrap();
    write!(
        base,
        r#"(
            activity: (
                level: 2,
                skins: [(name: "moon", palette: [1], center_visual: 0)],
                orderings: [["moon"]],
            ),
        )"#
    )
    .unwrap();
    write!(
        overlay,
        r#"(activity: (
            level: 8,
            repeat_after_complete: true,
            difficulties: [(rating: "Hard", object_count: 4, completed_levels_threshold: 8)],
        ))"#
    )
    .unwrap();
    let missing = std::path::PathBuf::from("does/not/exist.ron");
    let (cfg, used, errors) =
        GameConfig::load_layered([base.path().to_path_buf(), missing, overlay.path().to_path_buf()]);
    assert_eq!(used.len(), 2);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("read error"));
    assert_eq!(cfg.activity.level, 8);
    assert!(cfg.activity.repeat_after_complete);
    assert_eq!(cfg.activity.skins.len(), 1);
    assert_eq!(cfg.activity.skins[0].name, "moon");
    assert_eq!(cfg.activity.difficulties[0].rating, DifficultyRating::Hard);
    assert_eq!(cfg.activity.difficulties[0].object_count, 4);
    assert!(cfg.validate().is_empty());
}

#[test]
fn validation_flags_unusable_activity() {
    let mut cfg = GameConfig::default();
    cfg.activity.difficulties.clear();
    cfg.activity.skins[0].palette.clear();
    cfg.counting.pick_radius = 0.0;
    let warnings = cfg.validate();
    assert!(warnings.iter().any(|w| w.contains("difficulties is empty")));
    assert!(warnings.iter().any(|w| w.contains("empty palette")));
    assert!(warnings.iter().any(|w| w.contains("pick_radius")));
}
