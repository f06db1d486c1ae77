use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use reviews_admin_api::draft::{
    CategorySeed, Feedback, SaveError, SaveStatus, SectorDraft, SectorSavePayload, SectorSaver,
    SectorSeed,
};

/// Saver that records every payload it receives and can be told to fail.
struct RecordingSaver {
    payloads: Mutex<Vec<SectorSavePayload>>,
    fail_with: Option<String>,
}

impl RecordingSaver {
    fn ok() -> Self {
        Self { payloads: Mutex::new(Vec::new()), fail_with: None }
    }

    fn failing(reason: &str) -> Self {
        Self { payloads: Mutex::new(Vec::new()), fail_with: Some(reason.to_string()) }
    }

    fn received(&self) -> Vec<SectorSavePayload> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl SectorSaver for RecordingSaver {
    async fn save_sector(&self, payload: &SectorSavePayload) -> Result<(), SaveError> {
        self.payloads.lock().unwrap().push(payload.clone());
        match &self.fail_with {
            Some(reason) => Err(SaveError(reason.clone())),
            None => Ok(()),
        }
    }
}

fn ristoranti_draft() -> (SectorDraft, Uuid, Uuid) {
    let sector_id = Uuid::new_v4();
    let category_id = Uuid::new_v4();
    let sector = SectorSeed {
        id: sector_id,
        name: "Ristoranti".to_string(),
        description: None,
        platforms: vec!["google_maps".to_string()],
        prompt_template: None,
    };
    let categories = vec![CategorySeed { id: category_id, name: "Pizzerie".to_string() }];
    (SectorDraft::from_existing(&sector, &categories), sector_id, category_id)
}

#[test]
fn ristoranti_scenario_end_to_end() {
    let (mut draft, sector_id, category_id) = ristoranti_draft();

    // Duplicate of a seeded category: collection unchanged, error surfaced.
    draft.add_category("Pizzerie");
    assert_eq!(draft.categories().len(), 1);
    assert_eq!(
        draft.feedback(),
        Some(&Feedback::Error("Categoria gia' presente.".to_string()))
    );

    // A fresh name appends and clears the error.
    draft.add_category("Trattorie");
    assert_eq!(draft.categories().len(), 2);
    assert_eq!(draft.categories()[0].name, "Pizzerie");
    assert_eq!(draft.categories()[0].id, Some(category_id));
    assert_eq!(draft.categories()[1].name, "Trattorie");
    assert_eq!(draft.categories()[1].id, None);
    assert!(draft.feedback().is_none());

    let payload = draft.build_save_payload().unwrap();
    assert_eq!(payload.sector_id, Some(sector_id));
    assert_eq!(payload.name, "Ristoranti");
    assert_eq!(payload.platforms, vec!["google_maps".to_string()]);
    assert_eq!(payload.description, None);
    assert_eq!(payload.prompt_template, None);
    assert_eq!(payload.categories.len(), 2);
    assert_eq!(payload.categories[0].id, Some(category_id));
    assert_eq!(payload.categories[0].name, "Pizzerie");
    assert_eq!(payload.categories[1].id, None);
    assert_eq!(payload.categories[1].name, "Trattorie");
}

#[tokio::test]
async fn submit_hands_the_normalized_payload_to_the_saver() {
    let (mut draft, _, _) = ristoranti_draft();
    draft.add_category("  Trattorie ");

    let saver = RecordingSaver::ok();
    draft.submit(&saver).await;

    assert_eq!(draft.status(), SaveStatus::Idle);
    assert!(matches!(draft.feedback(), Some(Feedback::Ok(_))));

    let received = saver.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].categories[1].name, "Trattorie");
    assert_eq!(received[0], draft.build_save_payload().unwrap());
}

#[tokio::test]
async fn submit_with_blank_name_never_reaches_the_saver() {
    let mut draft = SectorDraft::new();
    draft.set_name("   ");

    let saver = RecordingSaver::ok();
    draft.submit(&saver).await;

    assert!(saver.received().is_empty());
    assert_eq!(draft.status(), SaveStatus::Idle);
    assert!(matches!(draft.feedback(), Some(Feedback::Error(_))));
}

#[tokio::test]
async fn saver_failure_leaves_an_editable_draft_with_error_feedback() {
    let (mut draft, _, _) = ristoranti_draft();

    let saver = RecordingSaver::failing("connection reset");
    draft.submit(&saver).await;

    assert_eq!(draft.status(), SaveStatus::Idle);
    match draft.feedback() {
        Some(Feedback::Error(msg)) => assert!(msg.contains("connection reset")),
        other => panic!("expected error feedback, got {:?}", other),
    }

    // The draft stays usable: fix nothing, retry, succeed.
    let retry = RecordingSaver::ok();
    draft.submit(&retry).await;
    assert!(matches!(draft.feedback(), Some(Feedback::Ok(_))));
}

#[test]
fn reset_from_discards_unsaved_edits_for_the_new_baseline() {
    let (mut draft, sector_id, _) = ristoranti_draft();
    draft.add_category("Trattorie");
    draft.toggle_platform("booking");

    let refreshed_sector = SectorSeed {
        id: sector_id,
        name: "Ristoranti".to_string(),
        description: Some("Locali e cucina".to_string()),
        platforms: vec!["google_maps".to_string(), "tripadvisor".to_string()],
        prompt_template: None,
    };
    let refreshed = vec![CategorySeed { id: Uuid::new_v4(), name: "Osterie".to_string() }];
    draft.reset_from(&refreshed_sector, &refreshed);

    assert_eq!(draft.description(), "Locali e cucina");
    assert_eq!(draft.platforms().len(), 2);
    let names: Vec<_> = draft.categories().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Osterie"]);
}
