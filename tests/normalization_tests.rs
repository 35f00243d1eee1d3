use serde_json::json;
use storyboard_lib::storyboard::{
    normalize, model::AudioView, DocumentView, PromptSlot, RawDocument,
};

const IMAGE_SCENE: &str = include_str!("fixtures/image_scene.json");
const VIDEO_SCENE: &str = include_str!("fixtures/video_scene.json");
const AUDIO_SCENE: &str = include_str!("fixtures/audio_scene.json");

fn storyboard(text: &str) -> storyboard_lib::storyboard::UnifiedModel {
    let raw = RawDocument::parse(text).expect("parse fixture");
    match normalize(&raw).expect("normalize fixture") {
        DocumentView::Storyboard(model) => model,
        DocumentView::Audio(_) => panic!("expected a storyboard view"),
    }
}

#[test]
fn image_documents_flatten_in_document_order() {
    let doc = json!({
        "scene_info": {"scene_id": "S01"},
        "shots": [
            {"shot_id": "S01.01", "images": [
                {"image_id": "a", "prompts": {}},
                {"image_id": "b", "prompts": {}}
            ]},
            {"shot_id": "S01.02", "images": [{"image_id": "c", "prompts": {}}]}
        ]
    });
    let model = storyboard(&doc.to_string());
    let ids: Vec<(&str, &str)> = model
        .prompts
        .iter()
        .map(|entry| (entry.image_id.as_str(), entry.shot_id.as_str()))
        .collect();
    assert_eq!(ids, vec![("a", "S01.01"), ("b", "S01.01"), ("c", "S01.02")]);
}

#[test]
fn minimal_image_scenario_normalizes() {
    let doc = json!({
        "shots": [{
            "shot_id": "S01.01",
            "shot_description": "intro",
            "image_count": 1,
            "images": [{
                "image_id": "S01.01-A-01",
                "image_title": "t",
                "image_description": "d",
                "csv_data": {"STYLE": "noir"},
                "prompts": {
                    "universal": "STYLE: noir",
                    "universal_translated": "",
                    "nanobana": "x",
                    "nanobana_translated": ""
                }
            }]
        }],
        "scene_info": {"scene_id": "S01", "sequence_id": "SEQ1", "shot_count": 1, "total_images": 1},
        "generation_settings": {
            "selected_ai_tools": ["universal"],
            "csv_modified": false,
            "consistency_prompt_generated": false
        },
        "version": "3.0",
        "timestamp": "2024-01-01T00:00:00Z"
    });
    let model = storyboard(&doc.to_string());
    assert_eq!(model.prompts.len(), 1);
    let entry = &model.prompts[0];
    assert_eq!(entry.image_id, "S01.01-A-01");
    assert_eq!(entry.shot_id, "S01.01");
    assert_eq!(entry.shot_description.as_deref(), Some("intro"));
    assert_eq!(entry.csv_data.as_ref().and_then(|csv| csv.get("STYLE")), Some(&json!("noir")));
    assert_eq!(entry.editable_slot, None);
    assert_eq!(model.scene_info.scene_title, "intro");
    assert_eq!(model.scene_info.selected_ai_tools, vec!["universal".to_string()]);
    assert_eq!(model.version.as_deref(), Some("3.0"));
}

#[test]
fn image_fixture_reports_scene_counts() {
    let model = storyboard(IMAGE_SCENE);
    assert_eq!(model.prompts.len(), 3);
    assert_eq!(model.scene_info.processed_shots, 2);
    assert_eq!(model.scene_info.processed_images, 3);
    assert_eq!(model.scene_info.scene_title, "A courier crosses the rainy plaza");
}

#[test]
fn video_fixture_resolves_prompt_slots() {
    let model = storyboard(VIDEO_SCENE);
    assert_eq!(model.prompts.len(), 3);
    assert_eq!(model.scene_info.scene_title, "Night delivery");
    assert_eq!(model.scene_info.processed_shots, 2);
    assert_eq!(
        model.prompts[0].editable_slot,
        Some(PromptSlot::NestedUnderProvider {
            provider: "veo2".to_string()
        })
    );
    assert_eq!(model.prompts[1].editable_slot, Some(PromptSlot::Direct));
    assert_eq!(model.prompts[2].editable_slot, None);
    assert_eq!(model.prompts[0].image_title.as_deref(), Some("Plaza wide"));
    assert_eq!(model.prompts[0].prompts["kling"]["prompt_en"], "Courier crossing a rainy plaza.");
}

#[test]
fn video_counts_fall_back_to_entries() {
    let doc = json!({
        "scene_info": {"scene_id": "S09"},
        "video_prompts": [
            {"image_id": "S09.01-A-01", "shot_id": "S09.01", "prompts": {}},
            {"image_id": "S09.01-B-01", "shot_id": "S09.01", "prompts": {}}
        ]
    });
    let model = storyboard(&doc.to_string());
    assert_eq!(model.scene_info.scene_title, "S09");
    assert_eq!(model.scene_info.processed_shots, 1);
    assert_eq!(model.scene_info.processed_images, 2);
}

#[test]
fn missing_prompts_names_the_item() {
    let doc = json!({
        "scene_info": {"scene_id": "S01"},
        "video_prompts": [
            {"image_id": "S01.01-A-01", "shot_id": "S01.01", "prompts": {}},
            {"image_id": "S01.01-A-02", "shot_id": "S01.01"}
        ]
    });
    let raw = RawDocument::parse(&doc.to_string()).expect("video document");
    let err = normalize(&raw).expect_err("missing prompts");
    assert_eq!(err.code(), "NORMALIZATION_ERROR");
    assert!(err.to_string().contains("video_prompts[1] (S01.01-A-02)"), "{err}");
    assert!(err.to_string().contains("\"prompts\""), "{err}");
}

#[test]
fn missing_scene_info_is_a_normalization_error() {
    let raw = RawDocument::parse(r#"{"shots": []}"#).expect("image document");
    let err = normalize(&raw).expect_err("no scene_info");
    assert_eq!(err.code(), "NORMALIZATION_ERROR");
}

#[test]
fn duplicate_image_ids_are_rejected() {
    let doc = json!({
        "scene_info": {"scene_id": "S01"},
        "shots": [
            {"shot_id": "S01.01", "images": [{"image_id": "x", "prompts": {}}]},
            {"shot_id": "S01.02", "images": [{"image_id": "x", "prompts": {}}]}
        ]
    });
    let raw = RawDocument::parse(&doc.to_string()).expect("image document");
    let err = normalize(&raw).expect_err("duplicate ids");
    assert!(err.to_string().contains("duplicate image_id x"), "{err}");
}

#[test]
fn audio_documents_render_as_audio_view() {
    let raw = RawDocument::parse(AUDIO_SCENE).expect("audio document");
    let view = normalize(&raw).expect("normalize audio");
    let DocumentView::Audio(AudioView {
        description,
        lyrics,
        narration_script,
    }) = view
    else {
        panic!("expected audio view");
    };
    assert_eq!(description.as_deref(), Some("Slow synthwave with rain ambience, 80 bpm"));
    assert!(lyrics.as_deref().is_some_and(|text| text.contains("[Chorus]")));
    assert_eq!(narration_script, "The city never sleeps, and neither does she.");
}
