//! Pure derivation rules for turning link assets into a course outline.
//!
//! Nothing here touches storage. The topic separators and the minimum topic
//! length are heuristics kept in [`ComposerRules`] so they can be swapped out
//! once real clustering exists.

use std::collections::HashMap;

use crate::common::text::{cut_at_separators, sentence_case, split_sentences, truncate_chars};
use crate::modules::course::model::{Difficulty, KeyPoint};
use crate::modules::link::model::LinkAsset;

pub const DEFAULT_COURSE_TITLE: &str = "Creator Course";
pub const FALLBACK_KEY_POINT: &str = "Watch and reflect";

#[derive(Debug, Clone, PartialEq)]
pub struct ComposerRules {
    pub topic_separators: Vec<char>,
    pub topic_min_chars: usize,
    pub title_max_chars: usize,
    pub summary_max_chars: usize,
    pub module_description_max_chars: usize,
    pub max_key_points: usize,
    pub default_lesson_minutes: i32,
}

impl Default for ComposerRules {
    fn default() -> Self {
        Self {
            topic_separators: vec!['|', ':'],
            topic_min_chars: 4,
            title_max_chars: 80,
            summary_max_chars: 200,
            module_description_max_chars: 140,
            max_key_points: 3,
            default_lesson_minutes: 5,
        }
    }
}

type TopicStrategy = fn(&LinkAsset, &ComposerRules) -> Option<String>;

/// Evaluated in order; the first strategy that yields a key wins.
const TOPIC_STRATEGIES: [TopicStrategy; 2] = [topic_from_text, topic_from_platform];

fn topic_from_text(asset: &LinkAsset, rules: &ComposerRules) -> Option<String> {
    let source = asset.title.as_deref().or(asset.description.as_deref())?;
    let head = cut_at_separators(source, &rules.topic_separators).trim();
    (head.chars().count() >= rules.topic_min_chars).then(|| sentence_case(head))
}

fn topic_from_platform(asset: &LinkAsset, _rules: &ComposerRules) -> Option<String> {
    Some(format!("{} Highlights", asset.platform.label()))
}

pub fn topic_key(asset: &LinkAsset, rules: &ComposerRules) -> String {
    TOPIC_STRATEGIES
        .iter()
        .find_map(|strategy| strategy(asset, rules))
        .unwrap_or_default()
}

#[derive(Debug)]
pub struct ModuleBucket<'a> {
    pub title: String,
    pub description: Option<String>,
    pub assets: Vec<&'a LinkAsset>,
}

/// Buckets assets by topic key. Buckets come out in the order their first
/// asset appears in `assets`, and keep per-bucket insertion order.
pub fn group_into_modules<'a>(assets: &'a [LinkAsset], rules: &ComposerRules) -> Vec<ModuleBucket<'a>> {
    let mut buckets: Vec<ModuleBucket<'a>> = Vec::new();
    let mut by_topic: HashMap<String, usize> = HashMap::new();

    for asset in assets {
        let topic = topic_key(asset, rules);
        match by_topic.get(&topic) {
            Some(&idx) => buckets[idx].assets.push(asset),
            None => {
                by_topic.insert(topic.clone(), buckets.len());
                buckets.push(ModuleBucket {
                    title: topic,
                    description: module_description(asset, rules),
                    assets: vec![asset],
                });
            }
        }
    }

    buckets
}

fn module_description(asset: &LinkAsset, rules: &ComposerRules) -> Option<String> {
    asset
        .description
        .as_deref()
        .map(|d| sentence_case(truncate_chars(d, rules.module_description_max_chars)))
}

pub fn course_title(assets: &[LinkAsset], rules: &ComposerRules) -> String {
    let raw = assets
        .first()
        .and_then(|a| a.title.as_deref().or(a.description.as_deref()))
        .unwrap_or(DEFAULT_COURSE_TITLE);

    let head = cut_at_separators(raw, &rules.topic_separators);
    let title = sentence_case(truncate_chars(head, rules.title_max_chars));
    if title.trim().is_empty() {
        sentence_case(DEFAULT_COURSE_TITLE)
    } else {
        title
    }
}

pub fn course_subtitle(assets: &[LinkAsset]) -> String {
    let mut labels: Vec<&str> = Vec::new();
    for platform in assets.iter().map(|a| a.platform) {
        let label = platform.label();
        if !labels.contains(&label) {
            labels.push(label);
        }
    }
    format!("Auto-generated from {} content", labels.join(", "))
}

/// `order` is the 1-based position inside the module.
pub fn lesson_title(asset: &LinkAsset, order: usize) -> String {
    match asset.title.as_deref() {
        Some(title) => sentence_case(title),
        None => format!("Lesson {}", order),
    }
}

pub fn lesson_summary(asset: &LinkAsset, rules: &ComposerRules) -> Option<String> {
    if let Some(description) = asset.description.as_deref() {
        return Some(sentence_case(truncate_chars(description, rules.summary_max_chars)));
    }
    asset
        .title
        .as_deref()
        .map(|title| format!("An in-depth look at {}", title))
}

pub fn lesson_key_points(asset: &LinkAsset, rules: &ComposerRules) -> Vec<KeyPoint> {
    let source = asset
        .description
        .as_deref()
        .or(asset.title.as_deref())
        .unwrap_or("");

    let points: Vec<KeyPoint> = split_sentences(source)
        .take(rules.max_key_points)
        .map(|s| KeyPoint::new(sentence_case(s)))
        .collect();

    if points.is_empty() {
        vec![KeyPoint::new(FALLBACK_KEY_POINT)]
    } else {
        points
    }
}

pub fn infer_difficulty(title: Option<&str>) -> Difficulty {
    let descriptor = title.unwrap_or_default().to_lowercase();
    if descriptor.contains("advanced") || descriptor.contains("expert") {
        Difficulty::Advanced
    } else if descriptor.contains("intro") || descriptor.contains("beginner") {
        Difficulty::Beginner
    } else {
        Difficulty::Intermediate
    }
}

/// Whole minutes, rounded up; unknown or zero durations get the default.
pub fn estimate_minutes(duration_sec: Option<i32>, rules: &ComposerRules) -> i32 {
    match duration_sec {
        Some(secs) if secs > 0 => (secs - 1) / 60 + 1,
        _ => rules.default_lesson_minutes,
    }
}
