//! Output naming for category pages.
//!
//! Every tab gets a directory named after a slug of its label, and every
//! page of that tab a numbered file inside it:
//!
//! - `All Genre` page 1 → `all-genre/1.html`
//! - `Science Fiction` page 3 → `science-fiction/3.html`
//! - `Sci-Fi` and `Sci Fi` → `sci-fi/` and `sci-fi-2/` (first one wins)
//!
//! Slugs keep Unicode letters so non-Latin labels stay readable.

/// Lowercase `label`, replacing every run of non-alphanumeric characters
/// with a single dash. Falls back to `category` if nothing is left.
pub fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    let mut pending_dash = false;
    for c in label.chars() {
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
    if slug.is_empty() {
        "category".to_string()
    } else {
        slug
    }
}

/// Slugs for `labels`, in the same order, made unique by suffixing `-2`,
/// `-3`, … onto later collisions.
pub fn assign_slugs(labels: &[String]) -> Vec<String> {
    let mut taken: Vec<String> = Vec::with_capacity(labels.len());
    for label in labels {
        let base = slugify(label);
        let mut candidate = base.clone();
        let mut n = 2;
        while taken.contains(&candidate) {
            candidate = format!("{base}-{n}");
            n += 1;
        }
        taken.push(candidate);
    }
    taken
}

/// Path of page `page` of the tab with `slug`, relative to the site root.
pub fn page_path(slug: &str, page: usize) -> String {
    format!("{slug}/{page}.html")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_lowercases_and_dashes() {
        assert_eq!(slugify("All Genre"), "all-genre");
        assert_eq!(slugify("Science Fiction"), "science-fiction");
    }

    #[test]
    fn slug_collapses_punctuation_runs() {
        assert_eq!(slugify("  Drama & Crime!! "), "drama-crime");
        assert_eq!(slugify("Sci-Fi"), "sci-fi");
    }

    #[test]
    fn slug_keeps_unicode_letters() {
        assert_eq!(slugify("Роман"), "роман");
    }

    #[test]
    fn slug_of_symbols_only_falls_back() {
        assert_eq!(slugify("!!!"), "category");
        assert_eq!(slugify(""), "category");
    }

    #[test]
    fn assign_slugs_dedupes() {
        let labels = vec![
            "Sci-Fi".to_string(),
            "Sci Fi".to_string(),
            "sci fi".to_string(),
            "Drama".to_string(),
        ];
        assert_eq!(
            assign_slugs(&labels),
            vec!["sci-fi", "sci-fi-2", "sci-fi-3", "drama"]
        );
    }

    #[test]
    fn page_path_format() {
        assert_eq!(page_path("drama", 2), "drama/2.html");
    }
}
