use serde_json::json;
use storyboard_lib::{
    storyboard::{document::DocumentKind, path::PathSegment},
    studio::{StudioMode, StudioSession},
};

const IMAGE_SCENE: &str = include_str!("fixtures/image_scene.json");
const VIDEO_SCENE: &str = include_str!("fixtures/video_scene.json");
const AUDIO_SCENE: &str = include_str!("fixtures/audio_scene.json");

fn session_in(mode: StudioMode) -> StudioSession {
    let mut session = StudioSession::new();
    session.select_mode(mode).expect("select studio");
    session
}

#[test]
fn select_studio_only_from_home() {
    let mut session = session_in(StudioMode::Image);
    let err = session.select_mode(StudioMode::Video).expect_err("already in a studio");
    assert_eq!(err.code(), "INVALID_STATE");
    assert_eq!(session.mode(), StudioMode::Image);
}

#[test]
fn upload_switches_mode_to_detected_kind() {
    let mut session = session_in(StudioMode::Image);
    session.load_text("scene_video.json", VIDEO_SCENE).expect("load video");
    let snapshot = session.snapshot();
    assert_eq!(snapshot.mode, StudioMode::Video);
    assert!(snapshot.loaded);
    assert_eq!(snapshot.document_kind, Some(DocumentKind::Video));
    assert_eq!(snapshot.source_name.as_deref(), Some("scene_video.json"));
}

#[test]
fn upload_is_rejected_outside_file_studios() {
    let mut story = session_in(StudioMode::Story);
    let err = story.load_text("scene.json", IMAGE_SCENE).expect_err("story studio");
    assert_eq!(err.code(), "INVALID_STATE");
    assert_eq!(story.mode(), StudioMode::Story);
    assert!(!story.is_loaded());
    assert_eq!(story.last_error().map(|err| err.code()), Some("INVALID_STATE"));

    let mut home = StudioSession::new();
    assert!(home.load_text("scene.json", IMAGE_SCENE).is_err());
    assert_eq!(home.mode(), StudioMode::None);
}

#[test]
fn failed_upload_resets_cleanly() {
    let mut session = session_in(StudioMode::Video);
    session.load_text("scene_video.json", VIDEO_SCENE).expect("load video");

    let err = session.load_text("broken.json", "{ not json").expect_err("syntax error");
    assert_eq!(err.code(), "PARSE_ERROR");

    let snapshot = session.snapshot();
    assert_eq!(snapshot.mode, StudioMode::None);
    assert!(!snapshot.loaded);
    assert!(snapshot.model.is_none());
    assert!(snapshot.shots.is_empty());
    assert!(snapshot.source_name.is_none());
    assert_eq!(snapshot.last_error.map(|err| err.code()), Some("PARSE_ERROR"));
}

#[test]
fn unknown_shape_and_normalization_failures_also_reset() {
    let mut session = session_in(StudioMode::Image);
    session.load_text("scene.json", IMAGE_SCENE).expect("load image");
    let err = session.load_text("x.json", r#"{"hello": 1}"#).expect_err("unknown shape");
    assert_eq!(err.code(), "INVALID_DOCUMENT_SHAPE");
    assert!(!session.is_loaded());

    let mut session = session_in(StudioMode::Image);
    session.load_text("scene.json", IMAGE_SCENE).expect("load image");
    let err = session
        .load_text("x.json", r#"{"shots": [{"images": []}], "scene_info": {"scene_id": "S01"}}"#)
        .expect_err("shot without id");
    assert_eq!(err.code(), "NORMALIZATION_ERROR");
    assert_eq!(session.mode(), StudioMode::None);
    assert!(!session.is_loaded());
}

#[test]
fn go_home_preserves_document_but_clear_drops_it() {
    let mut session = session_in(StudioMode::Image);
    session.load_text("scene.json", IMAGE_SCENE).expect("load image");
    let epoch = session.epoch();

    session.go_home();
    assert_eq!(session.mode(), StudioMode::None);
    assert!(session.is_loaded());
    assert!(session.epoch() > epoch);

    session.select_mode(StudioMode::Image).expect("back to image");
    assert_eq!(session.snapshot().model.map(|model| model.prompts.len()), Some(3));

    session.clear();
    assert_eq!(session.mode(), StudioMode::None);
    assert!(!session.is_loaded());
    assert!(session.epoch() > epoch);
}

#[test]
fn snapshot_groups_shots_and_reports_duration() {
    let mut session = session_in(StudioMode::Image);
    session.load_text("scene.json", IMAGE_SCENE).expect("load image");
    let snapshot = session.snapshot();

    assert_eq!(snapshot.shots.len(), 2);
    assert_eq!(snapshot.shots[0].shot_id, "S01.01");
    let plans: Vec<&str> = snapshot.shots[0].plans.iter().map(|plan| plan.plan.as_str()).collect();
    assert_eq!(plans, vec!["A", "B"]);
    assert_eq!(snapshot.total_duration_seconds, Some(9.0));

    let encoded = serde_json::to_value(&snapshot).expect("encode snapshot");
    assert_eq!(encoded["mode"], "image");
    assert_eq!(encoded["documentKind"], "image");
    assert_eq!(encoded["shots"][0]["plans"][1]["imageIds"], json!(["S01.01-B-01"]));
}

#[test]
fn audio_upload_renders_audio_view() {
    let mut session = session_in(StudioMode::Audio);
    session.load_text("scene_audio.json", AUDIO_SCENE).expect("load audio");
    let snapshot = session.snapshot();
    assert_eq!(snapshot.mode, StudioMode::Audio);
    assert!(snapshot.model.is_none());
    assert_eq!(
        snapshot.audio.map(|audio| audio.narration_script),
        Some("The city never sleeps, and neither does she.".to_string())
    );
}

#[test]
fn edit_and_save_updates_model_and_export() {
    let mut session = session_in(StudioMode::Video);
    session.load_text("scene.json", VIDEO_SCENE).expect("load video");

    let draft = session.open_editor("S01.01-A-01").expect("open editor");
    assert_eq!(draft.value["core_module"]["project_style"], "cyberpunk noir");

    let path = vec![
        PathSegment::from("video_module"),
        PathSegment::from("sequence"),
        PathSegment::from(1),
        PathSegment::from("motion"),
    ];
    session.edit_field(&path, json!("courier waves")).expect("edit field");
    let fields = session.snapshot().draft.expect("draft").fields;
    assert!(fields.iter().any(|field| field.path == path && field.value == json!("courier waves")));

    session.save_draft().expect("save");
    assert!(session.draft().is_none());

    let snapshot = session.snapshot();
    let model = snapshot.model.expect("model");
    assert_eq!(
        model.prompts[0].prompts["veo2"]["prompt_object_v6"]["video_module"]["sequence"][1]["motion"],
        "courier waves"
    );

    let exported = session.export().expect("export");
    assert_eq!(exported.file_name, "scene_video.json");
    let doc: serde_json::Value = serde_json::from_str(&exported.contents).expect("exported json");
    assert_eq!(
        doc["video_prompts"][0]["prompts"]["veo2"]["prompt_object_v6"]["video_module"]["sequence"][1]["motion"],
        "courier waves"
    );
    assert_eq!(doc["video_prompts"][0]["prompts"]["kling"]["prompt_en"], "Courier crossing a rainy plaza.");
}

#[test]
fn saving_an_entry_without_slot_keeps_the_draft() {
    let mut session = session_in(StudioMode::Video);
    session.load_text("scene.json", VIDEO_SCENE).expect("load video");

    let draft = session.open_editor("S01.02-A-01").expect("open editor");
    assert!(draft.slot.is_none());
    assert_eq!(draft.value["video_module"]["sequence"], json!([]));

    let err = session.save_draft().expect_err("no slot");
    assert_eq!(err.code(), "NO_EDITABLE_TARGET");
    assert!(session.draft().is_some());
    assert_eq!(session.snapshot().last_error.map(|err| err.code()), Some("NO_EDITABLE_TARGET"));
}

#[test]
fn saving_a_draft_without_modules_is_rejected() {
    let mut session = session_in(StudioMode::Video);
    session.load_text("scene.json", VIDEO_SCENE).expect("load video");
    session.open_editor("S01.01-A-01").expect("open editor");
    session
        .edit_field(&vec![PathSegment::from("video_module")], json!("gone"))
        .expect("replace module");

    let err = session.save_draft().expect_err("invalid draft");
    assert_eq!(err.code(), "INVALID_INPUT");
    assert!(session.draft().is_some());
}

#[test]
fn discard_and_go_home_drop_the_draft() {
    let mut session = session_in(StudioMode::Video);
    session.load_text("scene.json", VIDEO_SCENE).expect("load video");
    session.open_editor("S01.01-B-01").expect("open editor");
    assert!(session.discard_draft());
    assert!(!session.discard_draft());

    session.open_editor("S01.01-B-01").expect("open editor");
    session.go_home();
    assert!(session.draft().is_none());
}

#[test]
fn unknown_entry_is_not_found() {
    let mut session = session_in(StudioMode::Video);
    session.load_text("scene.json", VIDEO_SCENE).expect("load video");
    let err = session.open_editor("S99.99-A-01").expect_err("missing entry");
    assert_eq!(err.code(), "NOT_FOUND");
}

#[test]
fn remove_shot_recounts_totals() {
    let mut session = session_in(StudioMode::Image);
    session.load_text("scene.json", IMAGE_SCENE).expect("load image");
    session.remove_shot("S01.01").expect("remove shot");

    let exported = session.export().expect("export");
    let doc: serde_json::Value = serde_json::from_str(&exported.contents).expect("json");
    assert_eq!(doc["scene_info"]["shot_count"], 1);
    assert_eq!(doc["scene_info"]["total_images"], 1);
    assert_eq!(session.snapshot().model.map(|model| model.prompts.len()), Some(1));

    let err = session.remove_shot("S01.01").expect_err("already removed");
    assert_eq!(err.code(), "NOT_FOUND");
}

#[test]
fn export_names_follow_document_kind() {
    let mut session = session_in(StudioMode::Image);
    session.load_text("scene.json", IMAGE_SCENE).expect("load image");
    assert_eq!(session.export().expect("export").file_name, "scene.json");

    session.load_text("scene.json", AUDIO_SCENE).expect("load audio");
    assert_eq!(session.export().expect("export").file_name, "scene_audio.json");

    session.clear();
    assert_eq!(session.export().expect_err("nothing loaded").code(), "INVALID_STATE");
}
