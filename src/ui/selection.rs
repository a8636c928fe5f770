//! Filterable snapshots of the active module set

use super::core::ModuleData;

/// An ordered set of module instances, as returned by
/// [`ModuleManager::get_modules`](super::ModuleManager::get_modules).
///
/// Filters return a new selection, so they chain:
/// `modules.with_class("news").except_module(me)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleSelection {
    modules: Vec<ModuleData>,
}

impl ModuleSelection {
    pub fn new(modules: Vec<ModuleData>) -> Self {
        Self { modules }
    }

    /// Modules carrying any of the space separated `classes`.
    pub fn with_class(&self, classes: &str) -> Self {
        self.by_class(classes, true)
    }

    /// Modules carrying none of the space separated `classes`.
    pub fn except_with_class(&self, classes: &str) -> Self {
        self.by_class(classes, false)
    }

    pub fn except_module(&self, identifier: &str) -> Self {
        Self::new(
            self.modules
                .iter()
                .filter(|m| m.identifier != identifier)
                .cloned()
                .collect(),
        )
    }

    /// Run `f` on every module in order.
    pub fn enumerate<F>(&self, mut f: F)
    where
        F: FnMut(&ModuleData),
    {
        for module in &self.modules {
            f(module);
        }
    }

    pub fn identifiers(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.identifier.as_str()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ModuleData> {
        self.modules.iter()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    fn by_class(&self, classes: &str, include: bool) -> Self {
        let wanted: Vec<&str> = classes.split_whitespace().collect();
        Self::new(
            self.modules
                .iter()
                .filter(|m| wanted.iter().any(|class| m.has_class(class)) == include)
                .cloned()
                .collect(),
        )
    }
}

impl IntoIterator for ModuleSelection {
    type Item = ModuleData;
    type IntoIter = std::vec::IntoIter<ModuleData>;

    fn into_iter(self) -> Self::IntoIter {
        self.modules.into_iter()
    }
}

impl<'a> IntoIterator for &'a ModuleSelection {
    type Item = &'a ModuleData;
    type IntoIter = std::slice::Iter<'a, ModuleData>;

    fn into_iter(self) -> Self::IntoIter {
        self.modules.iter()
    }
}
