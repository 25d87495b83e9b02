use crate::domain::Category;
use crate::domain::slug::slugify;
use crate::error::{DomainError, DomainResult};
use crate::ports::BaseRepository;

use super::Repositories;

#[derive(Clone)]
pub struct CategoryService {
    repos: Repositories,
}

impl CategoryService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub async fn list(&self) -> DomainResult<Vec<Category>> {
        Ok(self.repos.categories.list_all().await?)
    }

    /// Any authenticated caller may create categories.
    pub async fn create(&self, name: &str, slug: &str) -> DomainResult<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("name is required"));
        }

        let slug = slug.trim();
        if slug.is_empty() || slugify(slug) != slug {
            return Err(DomainError::validation(
                "slug must be lowercase letters and digits separated by single hyphens",
            ));
        }

        if self.repos.categories.find_by_slug(slug).await?.is_some() {
            return Err(DomainError::Conflict("Category slug already in use".to_string()));
        }

        let category = self
            .repos
            .categories
            .insert(Category::new(name.to_string(), slug.to_string()))
            .await?;

        tracing::info!(category_id = %category.id, slug = %category.slug, "Category created");
        Ok(category)
    }
}
