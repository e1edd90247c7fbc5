use std::fs;
use std::sync::Arc;
use std::thread;

use weatherwiz::{ClassifierConfig, ClassifierError, ModelManager};

const CORPUS_V1: &str = r#"
conversation:
  user_conversation:
    saludo: ["hola", "buenas"]
    despedida: ["chau", "hasta luego"]
  chatbot_conversation:
    saludo: ["¡Hola!"]
    despedida: ["¡Chau!"]
weather_status:
  weather_status:
    lluvia: ["lluvia ligera", "llovizna"]
    nublado: ["nubes dispersas"]
  chatbot_recomendations:
    lluvia: ["Llevá paraguas."]
    nublado: ["Llevá abrigo."]
"#;

const CORPUS_V2: &str = r#"
conversation:
  user_conversation:
    saludo: ["hola", "buenas"]
    despedida: ["chau", "hasta luego"]
    agradecimiento: ["gracias"]
  chatbot_conversation:
    saludo: ["¡Hola!"]
    despedida: ["¡Chau!"]
    agradecimiento: ["¡De nada!"]
"#;

fn setup_manager(contents: &str) -> (tempfile::TempDir, ModelManager) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("dataset.yml");
    fs::write(&path, contents).expect("write corpus");
    (dir, ModelManager::new(&path))
}

#[test]
fn test_models_are_cached_per_section_set() -> Result<(), ClassifierError> {
    let (_dir, manager) = setup_manager(CORPUS_V1);
    assert!(!manager.is_cached(["conversation"]));

    let first = manager.classifier(["conversation"])?;
    let second = manager.classifier(["conversation", "conversation"])?;
    assert!(Arc::ptr_eq(&first, &second));
    assert!(manager.is_cached(["conversation"]));

    let status = manager.classifier(["weather_status"])?;
    assert!(!Arc::ptr_eq(&first, &status));
    assert_eq!(status.info().class_labels, vec!["lluvia", "nublado"]);
    Ok(())
}

#[test]
fn test_refit_replaces_model() -> Result<(), ClassifierError> {
    let (dir, manager) = setup_manager(CORPUS_V1);
    let before = manager.classifier(["conversation"])?;
    assert_eq!(before.info().num_classes, 2);

    fs::write(dir.path().join("dataset.yml"), CORPUS_V2).unwrap();
    // cached model is served until an explicit refit
    assert!(Arc::ptr_eq(&before, &manager.classifier(["conversation"])?));

    let after = manager.refit(["conversation"])?;
    assert_eq!(after.info().num_classes, 3);
    assert!(Arc::ptr_eq(&after, &manager.classifier(["conversation"])?));
    // readers holding the old model are unaffected
    assert_eq!(before.info().num_classes, 2);
    Ok(())
}

#[test]
fn test_reload_if_changed() -> Result<(), ClassifierError> {
    let (dir, manager) = setup_manager(CORPUS_V1);
    assert!(!manager.corpus_changed()?);

    manager.classifier(["conversation"])?;
    assert!(!manager.corpus_changed()?);
    assert!(!manager.reload_if_changed()?);

    fs::write(dir.path().join("dataset.yml"), CORPUS_V2).unwrap();
    assert!(manager.corpus_changed()?);
    assert!(manager.reload_if_changed()?);
    assert!(!manager.is_cached(["conversation"]));

    let reloaded = manager.classifier(["conversation"])?;
    assert_eq!(reloaded.info().num_classes, 3);
    assert!(!manager.corpus_changed()?);
    Ok(())
}

#[test]
fn test_edit_is_detected_after_fitting_another_section_set() -> Result<(), ClassifierError> {
    let (dir, manager) = setup_manager(CORPUS_V1);
    let stale = manager.classifier(["conversation"])?;
    assert_eq!(stale.info().num_classes, 2);

    let edited = format!("{}{}", CORPUS_V2, &CORPUS_V1[CORPUS_V1.find("weather_status:").unwrap()..]);
    fs::write(dir.path().join("dataset.yml"), edited).unwrap();
    // fitting a second set reads the edited file but must not hide the stale one
    manager.classifier(["weather_status"])?;

    assert!(manager.corpus_changed()?);
    assert!(manager.reload_if_changed()?);
    assert_eq!(manager.classifier(["conversation"])?.info().num_classes, 3);
    assert!(!manager.corpus_changed()?);
    Ok(())
}

#[test]
fn test_invalid_utf8_corpus() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("dataset.yml");
    let mut bytes = CORPUS_V1.as_bytes().to_vec();
    bytes.extend_from_slice(b"\n# \xFF\n");
    fs::write(&path, bytes).expect("write corpus");

    let manager = ModelManager::new(&path);
    assert!(matches!(manager.classifier(["conversation"]), Err(ClassifierError::ConfigError(_))));
    assert!(!manager.is_cached(["conversation"]));
}

#[test]
fn test_section_missing_after_edit() {
    let (dir, manager) = setup_manager(CORPUS_V1);
    fs::write(dir.path().join("dataset.yml"), CORPUS_V2).unwrap();
    let result = manager.classifier(["weather_status"]);
    assert!(matches!(result, Err(ClassifierError::ConfigError(_))));
}

#[test]
fn test_config_is_applied() -> Result<(), ClassifierError> {
    let (_dir, manager) = setup_manager(CORPUS_V1);
    let manager = manager.with_config(ClassifierConfig::default().with_threshold(0.9))?;
    assert_eq!(manager.classifier(["conversation"])?.info().threshold, 0.9);

    let (_dir, manager) = setup_manager(CORPUS_V1);
    assert!(manager.with_config(ClassifierConfig::default().with_threshold(2.0)).is_err());
    Ok(())
}

#[test]
fn test_concurrent_lookups_share_one_model() {
    let (_dir, manager) = setup_manager(CORPUS_V1);
    let manager = Arc::new(manager);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let manager = Arc::clone(&manager);
            thread::spawn(move || manager.classifier(["weather_status"]).unwrap())
        })
        .collect();
    let models: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    for model in &models[1..] {
        assert!(Arc::ptr_eq(&models[0], model));
    }
}
