use super::NarrationLanguage;

const CSV_FORMATTING_RULE: &str = "For each image's prompts.universal field, join every non-empty csv_data value as \"KEY: value\" separated by \"; \". The \"PARAMETERS: ...\" pair MUST come last, e.g. \"STYLE: cyberpunk noir; MEDIUM: photorealistic; QUALITY: cinematic; PARAMETERS: --ar 16:9\".\n";

const LANGUAGE_RULES: &str = "All user-facing descriptive fields (shot_description, image_title, image_description) must be in KOREAN.\nAll string values inside csv_data must be in ENGLISH.\n";

pub fn storyboard_prompt(idea: &str) -> String {
    let mut text = String::new();
    text.push_str("You are an expert storyboard creator for films and commercials. ");
    text.push_str("Based on the user's idea, create a series of shots as one JSON object that strictly follows the provided schema.\n\n");
    text.push_str("USER IDEA:\n");
    text.push_str(idea);
    text.push_str("\n\nFlesh out the story, scenes, characters, camera angles, and lighting.\n");
    text.push_str("Generate at least 3 shots with 1 to 3 images each, and give every shot an estimated_duration_seconds.\n");
    text.push_str(LANGUAGE_RULES);
    text.push_str(CSV_FORMATTING_RULE);
    text
}

/// `existing` is the `(shot_id, shot_description)` list already in the
/// storyboard, in order.
pub fn additional_shot_prompt(idea: Option<&str>, existing: &[(String, String)], next_shot_id: &str) -> String {
    let mut text = String::new();
    text.push_str("You are an expert storyboard creator. Based on the original idea and the existing shots, ");
    text.push_str("generate ONE new shot that logically follows the story.\n\n");
    if let Some(idea) = idea {
        text.push_str("ORIGINAL IDEA:\n");
        text.push_str(idea);
        text.push_str("\n\n");
    }
    text.push_str("EXISTING SHOTS:\n");
    for (shot_id, description) in existing {
        text.push_str(&format!("- {shot_id}: {description}\n"));
    }
    text.push_str(&format!(
        "\nThe new shot MUST use shot_id \"{next_shot_id}\" and its image ids must start with \"{next_shot_id}-\".\n"
    ));
    text.push_str("Return a single Shot object following the provided schema, including estimated_duration_seconds.\n");
    text.push_str(LANGUAGE_RULES);
    text.push_str(CSV_FORMATTING_RULE);
    text
}

pub fn video_prompts_prompt(image_document: &str) -> String {
    let mut text = String::new();
    text.push_str("Transform the provided image prompts JSON into video prompts JSON.\n\n");
    text.push_str("REQUIREMENTS:\n");
    text.push_str("1. Produce one video_prompts item per image, with veo2, kling and luma prompts.\n");
    text.push_str("2. Keep shot_id and image_id from the original.\n");
    text.push_str("3. Describe camera movement, action, and mood; fill veo2.prompt_object_v6 with a timed sequence.\n");
    text.push_str("4. Carry scene_info over from the original.\n\n");
    text.push_str("IMAGE PROMPTS:\n");
    text.push_str(image_document);
    text.push('\n');
    text
}

pub fn audio_prompts_prompt(image_document: &str, language: NarrationLanguage) -> String {
    let mut text = String::new();
    text.push_str("You are an expert composer and screenwriter. Based on the visual storyboard below, generate audio prompts. ");
    text.push_str(&format!(
        "Lyrics and narration must be in {}.\n\n",
        language.display_name()
    ));
    text.push_str("STORYBOARD:\n");
    text.push_str(image_document);
    text.push_str("\n\nInfer the story from the visual descriptions and return:\n");
    text.push_str("1. music_prompts.description: a detailed music style description in ENGLISH for a music model.\n");
    text.push_str("2. music_prompts.lyrics: original lyrics with [Verse 1] / [Chorus] markers.\n");
    text.push_str("3. narration_script: a complete narration to be read over the scenes.\n");
    text
}

pub fn connection_probe_prompt() -> String {
    "Reply with a JSON object {\"status\":\"ok\"}.".to_string()
}
