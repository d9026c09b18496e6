//! Dedicated per-service templates.
//!
//! A template turns a service's normalized content into the text block
//! written under its heading. Services without one use
//! [`render_fallback`](super::render_fallback).

use crate::error::Result;
use crate::model::NormalizedNode;
use std::collections::HashMap;
use std::sync::Arc;

/// Trait for service templates.
///
/// Implement this trait to give a service its own presentation.
pub trait ServiceTemplate: Send + Sync {
    /// Service name this template is registered under.
    fn service_name(&self) -> &str;

    /// Render normalized content into a text block. Lines are separated
    /// by `\n`.
    fn render(&self, content: &NormalizedNode) -> Result<String>;
}

/// Registry of service templates, keyed by lower-cased service name.
#[derive(Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, Arc<dyn ServiceTemplate>>,
}

impl TemplateRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template, replacing any previous one for the same service.
    pub fn register(&mut self, template: Arc<dyn ServiceTemplate>) {
        self.templates
            .insert(template.service_name().to_lowercase(), template);
    }

    /// Get the template for a service.
    pub fn get(&self, service_name: &str) -> Option<Arc<dyn ServiceTemplate>> {
        self.templates.get(&service_name.to_lowercase()).cloned()
    }

    /// Check if a service has a template.
    pub fn contains(&self, service_name: &str) -> bool {
        self.templates.contains_key(&service_name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl std::fmt::Debug for TemplateRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.templates.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        f.debug_struct("TemplateRegistry")
            .field("services", &names)
            .finish()
    }
}
