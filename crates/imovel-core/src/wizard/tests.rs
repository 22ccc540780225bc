use std::sync::Arc;

use serde_json::json;

use super::*;
use crate::{
    error::WizardError,
    test_support::{open_wizard, Call, MockApi},
};

#[test]
fn test_build_requires_api() {
    let err = WizardBuilder::new(1).build().err().expect("missing api must fail");
    assert!(matches!(err, WizardError::Configuration { .. }));
}

#[tokio::test]
async fn test_open_survives_missing_completeness() {
    let api = Arc::new(MockApi::new());
    let wizard = open_wizard(&api).await;

    assert_eq!(wizard.phase(), WizardPhase::Ready);
    assert_eq!(wizard.active_step(), StepId::Informacoes);
    assert_eq!(wizard.load_state(StepId::Informacoes), StepLoadState::Loaded);
    assert!(wizard.completed_steps().is_empty());
    assert!(wizard.step_data(StepId::Informacoes).is_none());
    assert_eq!(api.gets(StepId::Informacoes), 1);
    assert_eq!(api.count(&Call::Completeness), 1);
}

#[tokio::test]
async fn test_loaded_data_marks_step_complete() {
    let api = Arc::new(
        MockApi::new()
            .with_step(StepId::Comodos, json!({"dormitorios": 3}))
            .with_step(StepId::Preco, json!({"valor_venda": null})),
    );
    let wizard = open_wizard(&api).await;

    wizard.go_to(StepId::Comodos).await;
    wizard.go_to(StepId::Preco).await;

    assert!(wizard.is_complete(StepId::Comodos));
    assert!(wizard.show_saved_badge(StepId::Comodos));
    // Loaded, cached, but with nothing meaningful in it.
    assert!(wizard.step_data(StepId::Preco).is_some());
    assert!(!wizard.is_complete(StepId::Preco));
}

#[tokio::test]
async fn test_navigation_bounds_are_no_ops() {
    let api = Arc::new(MockApi::new());
    let wizard = open_wizard(&api).await;

    assert_eq!(wizard.go_previous().await, StepId::Informacoes);
    wizard.go_to(StepId::Publicacao).await;
    assert_eq!(wizard.go_next().await, StepId::Publicacao);
    assert_eq!(wizard.go_previous().await, StepId::Imagens);

    // Informacoes and Publicacao are remote; Imagens never hits the network.
    assert_eq!(api.gets(StepId::Informacoes), 1);
    assert_eq!(api.gets(StepId::Publicacao), 1);
    assert_eq!(api.gets(StepId::Imagens), 0);
    assert_eq!(wizard.load_state(StepId::Imagens), StepLoadState::Loaded);
    assert_eq!(wizard.step_loading(), None);
}

#[tokio::test]
async fn test_refresh_step_fetches_again() {
    let api = Arc::new(MockApi::new());
    let wizard = open_wizard(&api).await;

    wizard.ensure_loaded(StepId::Informacoes).await;
    assert_eq!(api.gets(StepId::Informacoes), 1);
    wizard.refresh_step(StepId::Informacoes).await;
    assert_eq!(api.gets(StepId::Informacoes), 2);
}

#[tokio::test]
async fn test_no_change_notification_skips_network() {
    let api = Arc::new(MockApi::new());
    let wizard = open_wizard(&api).await;
    let payload = StepPayload::try_from(json!({"dormitorios": 2})).unwrap();

    let saved = wizard
        .on_step_update(StepId::Comodos, payload, false)
        .await
        .unwrap();
    assert!(!saved);
    assert!(api.puts().is_empty());
    assert!(!wizard.is_complete(StepId::Comodos));
}

#[tokio::test]
async fn test_save_merges_sent_fields() {
    let api = Arc::new(MockApi::new().with_step(StepId::Comodos, json!({"suites": 1})));
    let wizard = open_wizard(&api).await;
    wizard.go_to(StepId::Comodos).await;

    let payload = StepPayload::try_from(json!({"dormitorios": 2})).unwrap();
    wizard.mark_changed(StepId::Comodos);
    assert!(wizard
        .on_step_update(StepId::Comodos, payload, true)
        .await
        .unwrap());

    let stored = wizard.step_data(StepId::Comodos).unwrap();
    assert_eq!(stored.get("suites"), Some(&json!(1)));
    assert_eq!(stored.get("dormitorios"), Some(&json!(2)));
    assert!(!wizard.has_unsaved(StepId::Comodos));
    assert!(wizard.step_summaries()[1].saved_at.is_some());
}

#[tokio::test]
async fn test_failed_save_alerts_and_keeps_trackers() {
    let api = Arc::new(MockApi::new());
    let wizard = open_wizard(&api).await;
    api
        .fail_puts
        .store(true, std::sync::atomic::Ordering::SeqCst);
    let mut events = wizard.subscribe();

    wizard.mark_changed(StepId::Preco);
    let payload = StepPayload::try_from(json!({"valor_venda": 450000})).unwrap();
    let err = wizard
        .on_step_update(StepId::Preco, payload, true)
        .await
        .unwrap_err();

    assert!(matches!(err, WizardError::Api { status: 500, .. }));
    assert!(!wizard.is_complete(StepId::Preco));
    assert!(wizard.has_unsaved(StepId::Preco));
    assert!(wizard.step_data(StepId::Preco).is_none());
    assert_eq!(
        events.recv().await.unwrap(),
        WizardEvent::Alert {
            step: Some(StepId::Preco),
            message: "Erro ao salvar dados da etapa Preço. Tente novamente".to_string(),
        }
    );
}

#[tokio::test]
async fn test_local_only_step_saves_in_memory() {
    let api = Arc::new(MockApi::new());
    let wizard = open_wizard(&api).await;
    let mut events = wizard.subscribe();
    let payload = StepPayload::try_from(json!({"imagens": ["fachada.jpg"]})).unwrap();

    wizard.mark_changed(StepId::Imagens);
    assert!(wizard
        .on_step_update(StepId::Imagens, payload, true)
        .await
        .unwrap());

    assert!(api.puts().is_empty());
    assert!(wizard.is_complete(StepId::Imagens));
    assert!(!wizard.has_unsaved(StepId::Imagens));
    assert!(wizard.show_saved_badge(StepId::Imagens));
    assert_eq!(
        events.recv().await.unwrap(),
        WizardEvent::StepSaved {
            step: StepId::Imagens
        }
    );
}

#[tokio::test]
async fn test_finalize_twice_activates_once() {
    let wizard = open_wizard(&Arc::new(MockApi::new())).await;
    let mut events = wizard.subscribe();

    wizard.finalize().await.unwrap();
    wizard.finalize().await.unwrap();

    assert_eq!(wizard.phase(), WizardPhase::Finished);
    assert_eq!(events.recv().await.unwrap(), WizardEvent::Finalized { id: 42 });
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_step_summaries_mark_active_step() {
    let wizard = open_wizard(&Arc::new(MockApi::new())).await;
    wizard.go_to(StepId::Medidas).await;

    let summaries = wizard.step_summaries();
    assert_eq!(summaries.len(), 13);
    let active: Vec<StepId> = summaries.iter().filter(|s| s.active).map(|s| s.step).collect();
    assert_eq!(active, vec![StepId::Medidas]);
    assert_eq!(summaries[2].label, StepId::Medidas.label());
    assert!(summaries.iter().all(|s| !s.completed && !s.saved_badge));
}
