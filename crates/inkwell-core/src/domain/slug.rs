//! URL slugs for posts.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

static LAST_STAMP: AtomicI64 = AtomicI64::new(0);

/// Lowercase the title, collapse every run of non `[a-z0-9]` characters into
/// a single hyphen and trim hyphens from both ends.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Milliseconds since the epoch, strictly increasing within this process.
fn unique_millis() -> i64 {
    let now = Utc::now().timestamp_millis();
    let mut last = LAST_STAMP.load(Ordering::Relaxed);
    loop {
        let next = now.max(last + 1);
        match LAST_STAMP.compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(actual) => last = actual,
        }
    }
}

/// Slug for a new post: `<slugified title>-<millis>`. A title with nothing
/// to slugify still gets the hyphen, giving `-<millis>`.
pub fn post_slug(title: &str) -> String {
    format!("{}-{}", slugify(title), unique_millis())
}
