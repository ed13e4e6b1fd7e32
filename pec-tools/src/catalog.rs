//! Ordered catalog of discovered tools.

use std::collections::HashMap;

use pec_primitives::ToolRecord;

use crate::error::{CatalogError, CatalogResult};

/// Tools in discovery order, addressable by name.
#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    tools: Vec<ToolRecord>,
    index: HashMap<String, usize>,
}

impl ToolCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from tools in order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateTool`] on the first repeated name.
    pub fn from_tools<I>(tools: I) -> CatalogResult<Self>
    where
        I: IntoIterator<Item = ToolRecord>,
    {
        let mut catalog = Self::new();
        for tool in tools {
            catalog.register(tool)?;
        }
        Ok(catalog)
    }

    /// Appends a tool.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateTool`] if the name is already present.
    pub fn register(&mut self, tool: ToolRecord) -> CatalogResult<()> {
        if self.index.contains_key(tool.name()) {
            return Err(CatalogError::DuplicateTool {
                name: tool.name().to_owned(),
            });
        }
        self.index.insert(tool.name().to_owned(), self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    /// Returns the tool with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ToolRecord> {
        self.index.get(name).map(|&position| &self.tools[position])
    }

    /// Returns tools in registration order.
    #[must_use]
    pub fn tools(&self) -> &[ToolRecord] {
        &self.tools
    }

    /// Returns the number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns `true` when no tool is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl IntoIterator for ToolCatalog {
    type Item = ToolRecord;
    type IntoIter = std::vec::IntoIter<ToolRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.tools.into_iter()
    }
}
