use std::collections::BTreeMap;

use crate::storyboard::model::NormalizedPromptEntry;

pub const DEFAULT_PLAN: &str = "A";

#[derive(Debug, Clone, PartialEq)]
pub struct ShotGroup<'a> {
    pub shot_id: &'a str,
    pub shot_description: Option<&'a str>,
    pub entries: Vec<&'a NormalizedPromptEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanGroup<'a> {
    pub plan: String,
    pub entries: Vec<&'a NormalizedPromptEntry>,
}

/// Groups entries by `shot_id` in first-seen order. Every entry lands in
/// exactly one group.
pub fn group_by_shot(entries: &[NormalizedPromptEntry]) -> Vec<ShotGroup<'_>> {
    let mut groups: Vec<ShotGroup<'_>> = Vec::new();
    for entry in entries {
        match groups.iter_mut().find(|group| group.shot_id == entry.shot_id) {
            Some(group) => group.entries.push(entry),
            None => groups.push(ShotGroup {
                shot_id: &entry.shot_id,
                shot_description: entry.shot_description.as_deref(),
                entries: vec![entry],
            }),
        }
    }
    groups
}

/// Plan letter from an `{shot}-{plan}-{index}` image id.
pub fn plan_key(image_id: &str) -> &str {
    match image_id.split('-').nth(1) {
        Some(plan) if !plan.is_empty() => plan,
        _ => DEFAULT_PLAN,
    }
}

impl<'a> ShotGroup<'a> {
    /// Plans sorted by key; entries keep their order within a plan.
    pub fn plans(&self) -> Vec<PlanGroup<'a>> {
        let mut by_plan: BTreeMap<&str, Vec<&'a NormalizedPromptEntry>> = BTreeMap::new();
        for entry in self.entries.iter().copied() {
            by_plan.entry(plan_key(&entry.image_id)).or_default().push(entry);
        }
        by_plan
            .into_iter()
            .map(|(plan, entries)| PlanGroup {
                plan: plan.to_string(),
                entries,
            })
            .collect()
    }
}
