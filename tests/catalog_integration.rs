//! Catalog and preferences loading from disk

use linguaflow::app::{InputAction, Session};
use linguaflow::config::{AppConfig, ScreenCatalog};
use linguaflow::flow::{AnimationSettings, SelectionMode};
use linguaflow::models::ScreenId;
use linguaflow::LinguaError;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

fn demo_catalog() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/catalog.toml")
}

#[test]
fn test_demo_catalog_is_valid() {
    let catalog = ScreenCatalog::load(&demo_catalog()).unwrap();
    catalog.validate(&catalog.registry()).unwrap();
    assert_eq!(catalog.initial, ScreenId::Onboarding);
    assert!(catalog.get(ScreenId::Login).is_none());
}

#[test]
fn test_demo_catalog_drives_a_session() {
    let catalog = ScreenCatalog::load(&demo_catalog()).unwrap();
    let mut session = Session::new(catalog, AnimationSettings::default()).unwrap();

    // the sign-in option has no destination and cannot be chosen
    session.handle(InputAction::Down).unwrap();
    session.handle(InputAction::Select).unwrap();
    assert!(!session.view().controller().continue_enabled());

    session.handle(InputAction::Up).unwrap();
    session.handle(InputAction::Select).unwrap();
    session.handle(InputAction::Next).unwrap();
    session.handle(InputAction::Select).unwrap();
    assert_eq!(session.current_screen(), ScreenId::LevelSelect);

    // continue without a level falls back to module select
    session.handle(InputAction::Next).unwrap();
    session.handle(InputAction::Select).unwrap();
    assert_eq!(session.current_screen(), ScreenId::ModuleSelect);
}

#[test]
fn test_demo_vocabulary_is_multi_choice() {
    let catalog = ScreenCatalog::load(&demo_catalog()).unwrap();
    let spec = catalog.get(ScreenId::VocabularyCategories).unwrap();
    match &spec.kind {
        linguaflow::config::ScreenKind::Choice { mode, .. } => {
            assert_eq!(*mode, SelectionMode::Multi)
        }
        other => panic!("unexpected kind {:?}", other),
    }
}

#[test]
fn test_catalog_with_dangling_destination_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("catalog.toml");
    fs::write(
        &path,
        r#"
        initial = "home"

        [[screens]]
        id = "home"
        title = "Home"

        [screens.kind]
        type = "choice"

        [[screens.kind.options]]
        id = "go"
        label = "Go"
        destination = "lesson"
        "#,
    )
    .unwrap();

    let catalog = ScreenCatalog::load(&path).unwrap();
    let err = Session::new(catalog, AnimationSettings::default()).unwrap_err();
    assert!(matches!(err, LinguaError::CatalogError(_)));
}

#[test]
fn test_missing_catalog_file() {
    let dir = TempDir::new().unwrap();
    let err = ScreenCatalog::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn test_config_points_at_catalog() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("linguaflow.toml");
    let config = AppConfig::default()
        .with_catalog_path(demo_catalog())
        .with_tick_rate(Duration::from_millis(50))
        .with_play_intro(false);
    config.save_to(&config_path).unwrap();

    let loaded = AppConfig::load_from(&config_path).unwrap();
    assert_eq!(loaded, config);
    let catalog = loaded.load_catalog().unwrap();
    assert!(catalog.get(ScreenId::GrammarTopics).is_some());
}

#[test]
fn test_demo_labels_leave_the_disabled_suffix_to_the_screen() {
    let catalog = ScreenCatalog::load(&demo_catalog()).unwrap();
    for spec in &catalog.screens {
        if let linguaflow::config::ScreenKind::Choice { options, .. } = &spec.kind {
            for option in options {
                assert!(
                    !option.label.contains("coming soon"),
                    "{} repeats the disabled suffix",
                    option.id.as_str()
                );
            }
        }
    }
}
