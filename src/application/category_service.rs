use crate::domain::category::{Category, CategoryPatch, NewCategory, ALL_CATEGORY_ID};
use crate::domain::errors::DomainError;
use crate::domain::ports::CategoryRepository;

pub struct CategoryService<R> {
    repo: R,
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn get_all_categories(&self, include_all: bool) -> Result<Vec<Category>, DomainError> {
        let stored = self.repo.list()?;
        if !include_all {
            return Ok(stored);
        }
        let mut categories = Vec::with_capacity(stored.len() + 1);
        categories.push(Category::all());
        categories.extend(stored);
        Ok(categories)
    }

    /// `"all"` is answered without touching the store.
    pub fn get_category_by_id(&self, id: &str) -> Result<Option<Category>, DomainError> {
        if id == ALL_CATEGORY_ID {
            return Ok(Some(Category::all()));
        }
        self.repo.find_by_id(id)
    }

    pub fn category_exists(&self, id: &str) -> Result<bool, DomainError> {
        if id == ALL_CATEGORY_ID {
            return Ok(true);
        }
        self.repo.exists(id)
    }

    pub fn create_category(&self, new: NewCategory) -> Result<Category, DomainError> {
        let category = new.into_category()?;
        if self.repo.exists(&category.id)? {
            return Err(DomainError::Conflict(format!(
                "Category with ID '{}' already exists",
                category.id
            )));
        }
        let created = self.repo.insert(category)?;
        log::info!("Created category {}", created.id);
        Ok(created)
    }

    /// Renames or re-icons a stored category. `Ok(None)` when it does not exist.
    pub fn update_category(
        &self,
        id: &str,
        patch: CategoryPatch,
    ) -> Result<Option<Category>, DomainError> {
        if id == ALL_CATEGORY_ID {
            return Err(DomainError::invalid("The 'all' category cannot be modified"));
        }
        let updated = self.repo.update(id, &patch)?;
        if updated.is_some() {
            log::info!("Updated category {}", id);
        }
        Ok(updated)
    }

    pub fn delete_category(&self, id: &str) -> Result<bool, DomainError> {
        if id == ALL_CATEGORY_ID {
            return Err(DomainError::invalid("The 'all' category cannot be deleted"));
        }
        self.repo.delete(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::DEFAULT_ICON;
    use crate::domain::product::ProductFilter;
    use crate::domain::ports::ProductRepository;
    use crate::infrastructure::memory::InMemoryCatalog;

    /// A store that fails every call, standing in for an unreachable database.
    struct UnreachableStore;

    impl CategoryRepository for UnreachableStore {
        fn list(&self) -> Result<Vec<Category>, DomainError> {
            Err(DomainError::Internal("connection refused".to_string()))
        }
        fn find_by_id(&self, _id: &str) -> Result<Option<Category>, DomainError> {
            Err(DomainError::Internal("connection refused".to_string()))
        }
        fn exists(&self, _id: &str) -> Result<bool, DomainError> {
            Err(DomainError::Internal("connection refused".to_string()))
        }
        fn insert(&self, _category: Category) -> Result<Category, DomainError> {
            Err(DomainError::Internal("connection refused".to_string()))
        }
        fn update(&self, _id: &str, _patch: &CategoryPatch) -> Result<Option<Category>, DomainError> {
            Err(DomainError::Internal("connection refused".to_string()))
        }
        fn delete(&self, _id: &str) -> Result<bool, DomainError> {
            Err(DomainError::Internal("connection refused".to_string()))
        }
    }

    #[test]
    fn all_category_is_prepended_only_when_requested() {
        let service = CategoryService::new(InMemoryCatalog::new());
        service
            .create_category(NewCategory {
                name: Some("Snacks".to_string()),
                ..Default::default()
            })
            .expect("create");

        let with_all = service.get_all_categories(true).expect("list");
        assert_eq!(with_all.len(), 2);
        assert_eq!(with_all[0], Category::all());

        let without = service.get_all_categories(false).expect("list");
        assert_eq!(without.len(), 1);
        assert_eq!(without[0].id, "snacks");
    }

    #[test]
    fn all_category_resolves_on_empty_and_unreachable_stores() {
        let empty = CategoryService::new(InMemoryCatalog::new());
        let expected = Category {
            id: "all".to_string(),
            name: "All Products".to_string(),
            icon: "🛒".to_string(),
        };
        assert_eq!(empty.get_category_by_id("all").expect("get"), Some(expected.clone()));

        let unreachable = CategoryService::new(UnreachableStore);
        assert_eq!(unreachable.get_category_by_id("all").expect("get"), Some(expected));
        assert!(unreachable.category_exists("all").expect("exists"));
        assert!(unreachable.get_category_by_id("snacks").is_err());
    }

    #[test]
    fn create_derives_slug_and_rejects_duplicates() {
        let service = CategoryService::new(InMemoryCatalog::new());
        let created = service
            .create_category(NewCategory {
                name: Some("Dry Fruits & Nuts".to_string()),
                ..Default::default()
            })
            .expect("create");
        assert_eq!(created.id, "dry-fruits-nuts");
        assert_eq!(created.icon, DEFAULT_ICON);
        assert!(service.category_exists("dry-fruits-nuts").expect("exists"));

        let duplicate = service.create_category(NewCategory {
            name: Some("Dry fruits, nuts".to_string()),
            ..Default::default()
        });
        assert!(matches!(duplicate, Err(DomainError::Conflict(_))));
    }

    #[test]
    fn all_category_cannot_be_deleted() {
        let service = CategoryService::new(InMemoryCatalog::new());
        assert!(matches!(
            service.delete_category("all"),
            Err(DomainError::InvalidInput(_))
        ));
        assert!(!service.delete_category("snacks").expect("delete"));
    }

    #[test]
    fn update_renames_without_touching_the_id() {
        let service = CategoryService::new(InMemoryCatalog::new());
        service
            .create_category(NewCategory {
                name: Some("Snacks".to_string()),
                ..Default::default()
            })
            .expect("create");

        let updated = service
            .update_category(
                "snacks",
                CategoryPatch {
                    name: Some("Chips".to_string()),
                    icon: Some("🥔".to_string()),
                },
            )
            .expect("update")
            .expect("category exists");
        assert_eq!(updated.id, "snacks");
        assert_eq!(updated.name, "Chips");
        assert_eq!(service.get_category_by_id("snacks").expect("get"), Some(updated));

        let missing = service
            .update_category("dairy", CategoryPatch::default())
            .expect("update");
        assert!(missing.is_none());
    }

    #[test]
    fn all_category_cannot_be_updated() {
        let service = CategoryService::new(UnreachableStore);
        let err = service
            .update_category(
                "all",
                CategoryPatch {
                    name: Some("Everything".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid input: The 'all' category cannot be modified"
        );
    }

    #[test]
    fn deleting_a_category_leaves_its_products() {
        let catalog = std::sync::Arc::new(InMemoryCatalog::new());
        crate::infrastructure::seed::seed_if_empty(catalog.as_ref(), catalog.as_ref())
            .expect("seed");
        let service = CategoryService::new(catalog.clone());

        assert!(service.delete_category("grains").expect("delete"));
        let grains = ProductRepository::list(
            catalog.as_ref(),
            &ProductFilter::new(Some("grains".to_string()), None),
        )
        .expect("list");
        assert!(!grains.is_empty());
    }
}
