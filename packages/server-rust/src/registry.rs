use std::collections::HashMap;
use std::sync::Arc;

use adminforge_core::{Resource, ResourceBuilder};

use crate::error::RegistryError;

// ---------------------------------------------------------------------------
// RegistryBuilder
// ---------------------------------------------------------------------------

/// Collects resource definitions during startup.
#[derive(Debug, Default)]
#[must_use]
pub struct RegistryBuilder {
    by_name: HashMap<String, Arc<Resource>>,
    order: Vec<String>,
}

impl RegistryBuilder {
    /// Adds a resource. Registration order is the listing order.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateResource`] when the name is taken.
    pub fn register(mut self, resource: Resource) -> Result<Self, RegistryError> {
        let name = resource.name().to_string();
        if self.by_name.contains_key(&name) {
            return Err(RegistryError::DuplicateResource { name });
        }
        tracing::info!(resource = %name, fields = resource.fields().len(), "resource registered");
        self.by_name.insert(name.clone(), Arc::new(resource));
        self.order.push(name);
        Ok(self)
    }

    /// Builds a resource definition and registers it.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Config`] when the definition is invalid, or
    /// [`RegistryError::DuplicateResource`] when the name is taken.
    pub fn define(self, resource: ResourceBuilder) -> Result<Self, RegistryError> {
        let resource = resource.build()?;
        self.register(resource)
    }

    /// Freezes the registry.
    pub fn build(self) -> ResourceRegistry {
        ResourceRegistry {
            by_name: self.by_name,
            order: self.order,
        }
    }
}

// ---------------------------------------------------------------------------
// ResourceRegistry
// ---------------------------------------------------------------------------

/// Read-only set of resources, shared by all request handlers.
///
/// Provides two lookup mechanisms:
/// - **By name** (`get`): constant-time map lookup
/// - **In order** (`iter`): registration order, used for listings
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    by_name: HashMap<String, Arc<Resource>>,
    order: Vec<String>,
}

impl ResourceRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Retrieve a resource by its name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<Resource>> {
        self.by_name.get(name).cloned()
    }

    /// Resources in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Resource>> {
        self.order.iter().filter_map(|name| self.by_name.get(name))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use adminforge_core::{fields, ConfigError};

    use super::*;

    fn resource(name: &str) -> Resource {
        ResourceBuilder::new(name, name.to_uppercase())
            .field(fields::text("title", "Title"))
            .build()
            .expect("builds")
    }

    #[test]
    fn register_and_get_by_name() {
        let registry = ResourceRegistry::builder()
            .register(resource("article"))
            .expect("registers")
            .build();

        let found = registry.get("article").expect("registered");
        assert_eq!(found.title(), "ARTICLE");
    }

    #[test]
    fn get_unregistered_returns_none() {
        let registry = ResourceRegistry::builder().build();
        assert!(registry.get("nonexistent").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn iter_follows_registration_order() {
        let registry = ResourceRegistry::builder()
            .register(resource("zeta"))
            .and_then(|b| b.register(resource("alpha")))
            .and_then(|b| b.register(resource("mid")))
            .expect("registers")
            .build();

        let names: Vec<_> = registry.iter().map(|r| r.name().to_string()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let err = ResourceRegistry::builder()
            .register(resource("article"))
            .and_then(|b| b.register(resource("article")))
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateResource { ref name } if name == "article"));
    }

    #[test]
    fn define_builds_and_registers() {
        let registry = ResourceRegistry::builder()
            .define(ResourceBuilder::new("article", "Articles").field(fields::text("title", "Title")))
            .expect("defines")
            .build();
        assert_eq!(registry.get("article").expect("registered").fields().len(), 1);
    }

    #[test]
    fn define_reports_invalid_definition() {
        let err = ResourceRegistry::builder()
            .define(
                ResourceBuilder::new("article", "Articles")
                    .field(fields::text("title", "Title"))
                    .field(fields::text("title", "Again")),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Config(ConfigError::DuplicateKey { ref key, .. }) if key == "title"
        ));
    }

    #[test]
    fn lookups_share_one_definition() {
        let registry = ResourceRegistry::builder()
            .register(resource("article"))
            .expect("registers")
            .build();
        let a = registry.get("article").expect("registered");
        let b = registry.get("article").expect("registered");
        assert!(Arc::ptr_eq(&a, &b));
    }
}
