use std::collections::HashMap;

use poise::serenity_prelude::Emoji;

// Discord rejects embed field values over 1024 characters; the listing
// budget leaves room for the overflow marker line.
const EMBED_FIELD_LIMIT: usize = 1024;
const FIELD_TEXT_BUDGET: usize = 1000;

/// Name-keyed view of the guild's emojis.
///
/// Seeded once at startup and replaced wholesale by `update-emojis`, so it
/// always reflects the last fetch and nothing else.
#[derive(Debug, Default)]
pub struct EmojiGroup {
    by_name: HashMap<String, Emoji>,
}

impl EmojiGroup {
    pub fn new(emojis: Vec<Emoji>) -> Self {
        let by_name = emojis
            .into_iter()
            .map(|emoji| (emoji.name.clone(), emoji))
            .collect();
        EmojiGroup { by_name }
    }

    /// Renderable mention (`<:name:id>`) for the named emoji, if cached.
    pub fn mention(&self, name: &str) -> Option<String> {
        self.by_name.get(name).map(Emoji::to_string)
    }

    /// Display lines for every cached emoji, split into (normal, animated)
    /// and sorted by name so the listing is stable across fetches.
    pub fn listing(&self) -> (Vec<String>, Vec<String>) {
        let mut emojis: Vec<&Emoji> = self.by_name.values().collect();
        emojis.sort_by(|a, b| a.name.cmp(&b.name));

        let mut normal = Vec::new();
        let mut animated = Vec::new();
        for emoji in emojis {
            let line = format!("{emoji} • `:{}:`", emoji.name);
            if emoji.animated {
                animated.push(line);
            } else {
                normal.push(line);
            }
        }
        (normal, animated)
    }
}

/// Joins listing lines into an embed field value.
///
/// Empty partitions render a placeholder and oversized ones are cut off with
/// an overflow marker, since the platform rejects empty or over-limit values.
pub fn field_text(lines: &[String]) -> String {
    if lines.is_empty() {
        return "*none*".to_owned();
    }

    let mut text = String::new();
    let mut shown = 0;
    for line in lines {
        let grown = if text.is_empty() {
            line.len()
        } else {
            text.len() + 1 + line.len()
        };
        if grown > FIELD_TEXT_BUDGET {
            break;
        }
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(line);
        shown += 1;
    }

    if shown < lines.len() {
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(&format!("… and {} more", lines.len() - shown));
    }
    debug_assert!(text.len() <= EMBED_FIELD_LIMIT);
    text
}
