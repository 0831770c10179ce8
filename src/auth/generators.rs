/// Longest display name kept from a federated assertion, in characters
pub const MAX_DISPLAY_NAME_LEN: usize = 32;

/// Names a viewer who did not bring one
pub trait DisplayNameGenerator: Send + Sync {
    fn generate(&self) -> String;

    /// The asserted name, tidied, or a generated one when nothing usable was asserted
    fn resolve(&self, asserted: Option<&str>) -> String {
        match asserted.map(tidy_display_name) {
            Some(name) if !name.is_empty() => name,
            _ => self.generate(),
        }
    }
}

/// Two-word viewer names in title case, e.g. "Brave Heron"
pub struct ViewerNameGenerator {
    words: u8,
}

impl ViewerNameGenerator {
    pub fn new() -> Self {
        Self { words: 2 }
    }
}

impl Default for ViewerNameGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayNameGenerator for ViewerNameGenerator {
    fn generate(&self) -> String {
        petname::Petnames::default()
            .generate_one(self.words, " ")
            .split(' ')
            .map(capitalize)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Collapse whitespace runs and cap the length
fn tidy_display_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(MAX_DISPLAY_NAME_LEN)
        .collect::<String>()
        .trim_end()
        .to_string()
}
