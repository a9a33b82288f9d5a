/*
 * Copyright (C) 2026 Open Source Robotics Foundation
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 *
*/

use crate::*;
use serde::{Deserialize, Serialize};

pub const SINGLE_TEMPLATE: &str = "pose";
pub const COLLECTION_TEMPLATE: &str = "pose_list";

/// A named kind of pose file that users can pick when creating new files.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub name: String,
    pub kind: StoreKind,
}

impl Template {
    pub fn new(name: impl Into<String>, kind: StoreKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Ordered mapping from template names to the store variant they use.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct TemplateRegistry(pub Vec<Template>);

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self(vec![
            Template::new(SINGLE_TEMPLATE, StoreKind::Single),
            Template::new(COLLECTION_TEMPLATE, StoreKind::Collection),
        ])
    }
}

impl TemplateRegistry {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn get(&self, name: &str) -> Option<&Template> {
        self.0.iter().find(|t| t.name == name)
    }

    pub fn get_index(&self, index: usize) -> Option<&Template> {
        self.0.get(index)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|t| t.name == name)
    }

    pub fn kind_of(&self, name: &str) -> Result<StoreKind, StoreError> {
        self.get(name)
            .map(|t| t.kind)
            .ok_or_else(|| StoreError::UnknownTemplate(name.to_owned()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|t| t.name.as_str()).collect()
    }

    /// Register a template, replacing the kind of an existing template with
    /// the same name.
    pub fn insert(&mut self, name: impl Into<String>, kind: StoreKind) {
        let name = name.into();
        match self.0.iter_mut().find(|t| t.name == name) {
            Some(existing) => existing.kind = kind,
            None => self.0.push(Template::new(name, kind)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Template> {
        let index = self.index_of(name)?;
        Some(self.0.remove(index))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_templates() {
        let registry = TemplateRegistry::default();
        assert_eq!(registry.kind_of(SINGLE_TEMPLATE).unwrap(), StoreKind::Single);
        assert_eq!(
            registry.kind_of(COLLECTION_TEMPLATE).unwrap(),
            StoreKind::Collection
        );
        assert!(matches!(
            registry.kind_of("missing"),
            Err(StoreError::UnknownTemplate(_))
        ));
    }

    #[test]
    fn insert_and_remove() {
        let mut registry = TemplateRegistry::empty();
        registry.insert("grips", StoreKind::Collection);
        registry.insert("rest", StoreKind::Single);
        registry.insert("grips", StoreKind::Single);

        assert_eq!(registry.names(), vec!["grips", "rest"]);
        assert_eq!(registry.kind_of("grips").unwrap(), StoreKind::Single);
        assert_eq!(registry.get_index(1).unwrap().name, "rest");

        assert!(registry.remove("grips").is_some());
        assert!(registry.remove("grips").is_none());
        assert_eq!(registry.len(), 1);
    }
}
