// src/domain/article/invariants.rs

use super::entity::Article;
use crate::domain::FieldError;

const MAX_TITLE_CHARS: usize = 200;

/// Validates all Article invariants.
///
/// Every violated rule is reported, not just the first one.
pub fn validate_article(article: &Article) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if article.title.trim().is_empty() {
        errors.push(FieldError::new("title", "title cannot be empty"));
    } else if article.title.chars().count() > MAX_TITLE_CHARS {
        errors.push(FieldError::new(
            "title",
            format!("title cannot exceed {MAX_TITLE_CHARS} characters"),
        ));
    }

    if !is_valid_slug(&article.slug) {
        errors.push(FieldError::new(
            "slug",
            "slug must be lowercase letters, digits and '-'",
        ));
    }

    if article.author.trim().is_empty() {
        errors.push(FieldError::new("author", "author cannot be empty"));
    }

    if article.views < 0 {
        errors.push(FieldError::new("views", "views cannot be negative"));
    }

    errors
}

fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_article() {
        let article = Article::new("Hello", "hello", "ada");
        assert!(validate_article(&article).is_empty());
    }

    #[test]
    fn test_reports_every_invalid_field() {
        let mut article = Article::new("  ", "Not A Slug", "");
        article.views = -1;

        let fields: Vec<String> = validate_article(&article)
            .into_iter()
            .map(|e| e.field)
            .collect();

        assert_eq!(fields, vec!["title", "slug", "author", "views"]);
    }

    #[test]
    fn test_title_length_limit() {
        let article = Article::new("x".repeat(201), "long", "ada");
        let errors = validate_article(&article);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("200"));
    }
}
