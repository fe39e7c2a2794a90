use super::errors::DomainError;
use super::limits::{check_length, MAX_ICON_LEN, MAX_ID_LEN, MAX_NAME_LEN};

/// Id of the synthetic "no filter" category. Never stored.
pub const ALL_CATEGORY_ID: &str = "all";
pub const DEFAULT_ICON: &str = "🛒";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub icon: String,
}

#[derive(Debug, Clone, Default)]
pub struct NewCategory {
    pub id: Option<String>,
    pub name: Option<String>,
    pub icon: Option<String>,
}

/// Fields of a stored category that can be changed. The id is fixed.
#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub icon: Option<String>,
}

impl Category {
    pub fn all() -> Self {
        Self {
            id: ALL_CATEGORY_ID.to_string(),
            name: "All Products".to_string(),
            icon: DEFAULT_ICON.to_string(),
        }
    }

    /// Merges `patch` into this category. On error nothing changes.
    pub fn apply(&mut self, patch: &CategoryPatch) -> Result<(), DomainError> {
        patch.validate()?;
        if let Some(name) = &patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(icon) = patch.icon.as_ref().filter(|i| !i.trim().is_empty()) {
            self.icon = icon.clone();
        }
        Ok(())
    }
}

impl CategoryPatch {
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(DomainError::invalid("Category name cannot be empty"));
            }
            check_length(name.trim(), MAX_NAME_LEN, "Category name")?;
        }
        if let Some(icon) = &self.icon {
            check_length(icon, MAX_ICON_LEN, "Category icon")?;
        }
        Ok(())
    }
}

/// Lowercases `name` and joins its alphanumeric runs with single hyphens,
/// e.g. `"Grains & Rice"` becomes `"grains-rice"`.
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Slug of `name` cut to the id column width.
fn derived_id(name: &str) -> String {
    let mut slug = slugify(name);
    slug.truncate(MAX_ID_LEN);
    slug.trim_end_matches('-').to_string()
}

impl NewCategory {
    /// Resolves the id and icon defaults and checks the result can be stored.
    pub fn into_category(self) -> Result<Category, DomainError> {
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| DomainError::invalid("Category name is required"))?;
        check_length(&name, MAX_NAME_LEN, "Category name")?;

        let id = match self.id.map(|id| id.trim().to_string()) {
            Some(id) if !id.is_empty() => id,
            _ => derived_id(&name),
        };
        check_length(&id, MAX_ID_LEN, "Category ID")?;
        if id.is_empty() {
            return Err(DomainError::invalid(
                "Category name must contain letters or digits",
            ));
        }
        if id == ALL_CATEGORY_ID {
            return Err(DomainError::invalid("Category ID 'all' is reserved"));
        }

        let icon = self
            .icon
            .filter(|i| !i.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ICON.to_string());
        check_length(&icon, MAX_ICON_LEN, "Category icon")?;

        Ok(Category { id, name, icon })
    }
}
