//! Response schemas handed to the model, derived from Rust types.
//!
//! schemars emits JSON Schema; Gemini accepts an OpenAPI subset with
//! upper-case type names and no references, so `response_schema` inlines
//! everything and `to_gemini_dialect` keeps only the keywords the API reads.

use schemars::{generate::SchemaSettings, JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const KEPT_KEYWORDS: &[&str] = &["description", "enum", "nullable", "required"];

pub fn response_schema<T: JsonSchema>() -> Value {
    let mut settings = SchemaSettings::openapi3();
    settings.inline_subschemas = true;
    let schema = settings.into_generator().into_root_schema_for::<T>();
    to_gemini_dialect(schema.as_value())
}

fn is_null_schema(schema: &Value) -> bool {
    schema.get("type").and_then(Value::as_str) == Some("null")
}

pub fn to_gemini_dialect(schema: &Value) -> Value {
    let Some(object) = schema.as_object() else {
        return schema.clone();
    };

    for combinator in ["anyOf", "oneOf", "allOf"] {
        let Some(variants) = object.get(combinator).and_then(Value::as_array) else {
            continue;
        };
        let mut concrete = variants.iter().filter(|variant| !is_null_schema(variant));
        if let Some(first) = concrete.next() {
            let mut inner = to_gemini_dialect(first);
            if let Some(map) = inner.as_object_mut() {
                let nullable = variants.iter().any(is_null_schema)
                    || object.get("nullable").and_then(Value::as_bool) == Some(true);
                if nullable {
                    map.insert("nullable".to_string(), Value::Bool(true));
                }
                if let Some(description) = object.get("description") {
                    map.insert("description".to_string(), description.clone());
                }
            }
            return inner;
        }
    }

    let mut out = Map::new();
    match object.get("type") {
        Some(Value::String(kind)) => {
            out.insert("type".to_string(), Value::String(kind.to_uppercase()));
        }
        Some(Value::Array(kinds)) => {
            if let Some(kind) = kinds.iter().filter_map(Value::as_str).find(|kind| *kind != "null") {
                out.insert("type".to_string(), Value::String(kind.to_uppercase()));
            }
            if kinds.iter().any(|kind| kind.as_str() == Some("null")) {
                out.insert("nullable".to_string(), Value::Bool(true));
            }
        }
        _ => {}
    }
    for keyword in KEPT_KEYWORDS {
        if let Some(value) = object.get(*keyword) {
            out.insert((*keyword).to_string(), value.clone());
        }
    }
    if let Some(properties) = object.get("properties").and_then(Value::as_object) {
        let converted: Map<String, Value> = properties
            .iter()
            .map(|(name, property)| (name.clone(), to_gemini_dialect(property)))
            .collect();
        let ordering: Vec<Value> = properties.keys().cloned().map(Value::String).collect();
        out.insert("properties".to_string(), Value::Object(converted));
        out.insert("propertyOrdering".to_string(), Value::Array(ordering));
    }
    if let Some(items) = object.get("items") {
        out.insert("items".to_string(), to_gemini_dialect(items));
    }
    Value::Object(out)
}

// Image stage -------------------------------------------------------------

/// A storyboard: scenes broken into shots, each with one or more images.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StoryboardSpec {
    /// Stage number, must be 6.
    pub stage: u32,
    /// Format version, must be "3.0".
    pub version: String,
    /// Current timestamp in ISO 8601 format.
    pub timestamp: String,
    pub scene_info: StoryboardSceneSpec,
    pub generation_settings: StoryboardSettingsSpec,
    pub shots: Vec<ShotSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StoryboardSceneSpec {
    /// Scene id in the format SXX, e.g. S01.
    pub scene_id: String,
    /// Sequence id, e.g. SEQ001.
    pub sequence_id: String,
    /// Total number of shots generated.
    pub shot_count: u32,
    /// Total number of images across all shots.
    pub total_images: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StoryboardSettingsSpec {
    /// Must be ["universal", "nanobana"].
    pub selected_ai_tools: Vec<String>,
    /// Set to false.
    pub csv_modified: bool,
    /// Set to false.
    pub consistency_prompt_generated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ShotSpec {
    /// Shot id in the format SXX.XX, e.g. S01.01.
    pub shot_id: String,
    /// Brief description of the shot's purpose, in Korean.
    pub shot_description: String,
    /// Number of images in this shot.
    pub image_count: u32,
    /// Estimated duration of the shot in seconds.
    pub estimated_duration_seconds: u32,
    pub images: Vec<ImageSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ImageSpec {
    /// Image id in the format SXX.XX-A-XX, e.g. S01.01-A-01.
    pub image_id: String,
    /// Descriptive title, in Korean.
    pub image_title: String,
    /// One-sentence description, in Korean.
    pub image_description: String,
    pub csv_data: CsvDataSpec,
    pub prompts: ImagePromptsSpec,
}

/// Named visual attributes of one image. All values in English.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct CsvDataSpec {
    /// Overall visual style, e.g. 'cyberpunk noir'.
    pub style: String,
    /// Medium, e.g. 'photorealistic'.
    pub medium: String,
    /// Era or cultural reference.
    #[serde(rename = "ERA/CULTURAL_REF")]
    pub era_cultural_ref: Option<String>,
    /// Shot type and angle, e.g. 'medium shot'.
    pub camera: String,
    /// Brief description of the action.
    pub scene: String,
    pub character_1: Option<String>,
    pub character_1_detail: Option<String>,
    pub character_2: Option<String>,
    pub character_2_detail: Option<String>,
    pub character_3: Option<String>,
    pub character_3_detail: Option<String>,
    pub camera_effects: Option<String>,
    /// Main location of the scene.
    pub location: String,
    pub location_detail: Option<String>,
    /// Time of day and natural light.
    pub time_lighting: String,
    pub artificial_light: Option<String>,
    pub lighting_technique: Option<String>,
    /// Mood of the shot.
    pub atmosphere: String,
    pub weather: Option<String>,
    pub foreground: String,
    pub background: String,
    /// Color palette, e.g. 'warm and bright'.
    pub color_tone: String,
    /// Specific camera technology, e.g. '100mm macro lens'.
    pub camera_tech: Option<String>,
    /// Desired quality level.
    pub quality: String,
    /// Tool parameters; must include an aspect ratio such as '--ar 16:9'.
    pub parameters: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ImagePromptsSpec {
    /// Non-empty csv_data values as 'KEY: value' joined with '; ', PARAMETERS last.
    pub universal: String,
    /// Leave empty.
    pub universal_translated: String,
    /// Paragraph-style English prompt describing the whole scene.
    pub nanobana: String,
    /// Leave empty.
    pub nanobana_translated: String,
}

// Video stage -------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VideoDocumentSpec {
    /// Must be 7.
    pub stage: u32,
    /// Must be '7.1 (Hybrid)'.
    pub version: String,
    /// Current timestamp in ISO 8601 format.
    pub timestamp: String,
    pub scene_info: VideoSceneSpec,
    pub generation_settings: VideoSettingsSpec,
    pub video_prompts: Vec<VideoPromptSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VideoSceneSpec {
    pub scene_id: String,
    pub scene_title: String,
    pub source_stage5_file: String,
    pub processed_shots: u32,
    pub processed_images: u32,
    pub selected_ai_tools: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VideoSettingsSpec {
    pub selected_ai_tools: Vec<String>,
    pub translation_language: String,
    pub modification_mode: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VideoPromptSpec {
    pub image_id: String,
    pub shot_id: String,
    pub image_reference: ImageReferenceSpec,
    pub prompts: VideoProvidersSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ImageReferenceSpec {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VideoProvidersSpec {
    pub veo2: Veo2PromptSpec,
    pub kling: KlingPromptSpec,
    pub luma: LumaPromptSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ClipSettingsSpec {
    pub duration: String,
    pub camera_movement: Option<String>,
    pub aspect_ratio: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Veo2PromptSpec {
    pub prompt_en: String,
    pub prompt_translated: Option<String>,
    pub settings: ClipSettingsSpec,
    pub prompt_object_v6: PromptObjectSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct KlingPromptSpec {
    pub prompt_en: String,
    pub prompt_translated: Option<String>,
    pub settings: ClipSettingsSpec,
    pub kling_structured_prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LumaPromptSpec {
    pub prompt_en: String,
    pub prompt_translated: Option<String>,
    pub settings: ClipSettingsSpec,
}

/// Structured cinematic prompt: characters, location, and a timed sequence.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PromptObjectSpec {
    pub core_module: CoreModuleSpec,
    pub video_module: VideoModuleSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CoreModuleSpec {
    pub character: CharacterRosterSpec,
    pub location_baseline: LocationSpec,
    pub project_style: Option<String>,
}

/// Object properties must be declared up front, so the roster has fixed slots.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CharacterRosterSpec {
    pub char_01: Option<CharacterSpec>,
    pub char_02: Option<CharacterSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CharacterSpec {
    pub id: String,
    pub signature_details: Option<String>,
    pub voice_consistency: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LocationSpec {
    pub setting: String,
    pub details: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VideoModuleSpec {
    pub metadata: VideoMetadataSpec,
    pub global: GlobalSpec,
    pub dialogue_block: Option<DialogueSpec>,
    pub sequence: Vec<SequenceStepSpec>,
    pub negative_prompts: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VideoMetadataSpec {
    pub prompt_name: Option<String>,
    pub duration_seconds: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GlobalSpec {
    pub description: String,
    pub style: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DialogueSpec {
    pub dialogue: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SequenceStepSpec {
    pub timestamp: Option<String>,
    pub camera: Option<String>,
    pub motion: String,
    pub audio: Option<String>,
    pub effects: Option<Vec<EffectSpec>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EffectSpec {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
}

// Audio stage -------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AudioDocumentSpec {
    pub music_prompts: MusicPromptsSpec,
    /// Complete narration script in the requested language.
    pub narration_script: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MusicPromptsSpec {
    /// Detailed English music style description for a music model.
    pub description: String,
    /// Song lyrics in the requested language, with [Verse 1] / [Chorus] markers.
    pub lyrics: String,
}
