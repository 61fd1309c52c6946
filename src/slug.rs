//! Anchor slugs for heading IDs.

use std::collections::HashMap;

/// Turn heading text into an anchor slug.
///
/// Letters and digits are kept (lowercased); every run of anything else
/// becomes a single hyphen, and the slug never starts or ends with one.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Hands out slugs that are unique within one document.
#[derive(Debug, Default)]
pub struct HeadingIds {
    // Highest suffix used so far for each base slug.
    seen: HashMap<String, usize>,
}

impl HeadingIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `slug`, or `slug-N` with the first free `N` if it was taken.
    pub fn unique(&mut self, slug: String) -> String {
        let mut suffix = self.seen.get(&slug).copied().unwrap_or(0);
        let mut candidate = slug.clone();
        while self.seen.contains_key(&candidate) {
            suffix += 1;
            candidate = format!("{slug}-{suffix}");
        }
        self.seen.insert(slug, suffix);
        self.seen.entry(candidate.clone()).or_insert(0);
        candidate
    }
}
