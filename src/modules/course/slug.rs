use rand::distr::Alphanumeric;
use rand::Rng;

use super::repository::CourseRepository;
use crate::common::error::AppError;

const MAX_SLUG_CHARS: usize = 60;

/// Lower-cases, collapses every non-alphanumeric run into one hyphen and
/// caps the result at 60 characters without a dangling hyphen.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_hyphen = false;

    for c in input.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    slug.truncate(MAX_SLUG_CHARS);
    slug.trim_end_matches('-').to_string()
}

fn random_token(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect()
}

/// `base` plus a short random suffix.
pub fn disambiguate(base: &str) -> String {
    format!("{}-{}", base, random_token(4))
}

/// Picks a slug for `base` that no existing course uses yet.
///
/// The check is advisory: the caller still has to handle a unique-key
/// conflict at insert time and retry with [`disambiguate`].
pub async fn allocate_slug(
    repo: &(impl CourseRepository + ?Sized),
    base: &str,
) -> Result<String, AppError> {
    let candidate = if base.is_empty() {
        format!("course-{}", random_token(6))
    } else {
        base.to_string()
    };

    if repo.slug_exists(&candidate).await? {
        Ok(disambiguate(&candidate))
    } else {
        Ok(candidate)
    }
}
