//! Named styling components shared between rule blocks.
//!
//! A colour line such as `SetTextColor 255 0 0 # Danger` references the
//! component `(SetTextColor, "Danger")`. Blocks that use the same label share
//! the component, so recolouring it restyles all of them.

use serde::{Deserialize, Serialize};

use crate::{Color, ItemKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeComponent {
    pub kind: ItemKind,
    pub name: String,
    pub color: Color,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeComponents {
    components: Vec<ThemeComponent>,
}

impl ThemeComponents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find(&self, kind: ItemKind, name: &str) -> Option<&ThemeComponent> {
        self.components.iter().find(|c| c.kind == kind && c.name == name)
    }

    /// Return the component keyed by `(kind, name)`, creating it with `color`
    /// when it does not exist yet. An existing component keeps its colour.
    pub fn register(&mut self, kind: ItemKind, name: &str, color: Color) -> &ThemeComponent {
        let index = match self.components.iter().position(|c| c.kind == kind && c.name == name) {
            Some(index) => index,
            None => {
                self.components.push(ThemeComponent {
                    kind,
                    name: name.to_string(),
                    color,
                });
                self.components.len() - 1
            },
        };
        &self.components[index]
    }

    /// Change the colour of an existing component. Returns false when no such
    /// component is registered.
    pub fn set_color(&mut self, kind: ItemKind, name: &str, color: Color) -> bool {
        match self.components.iter_mut().find(|c| c.kind == kind && c.name == name) {
            Some(component) => {
                component.color = color;
                true
            },
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ThemeComponent> {
        self.components.iter()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}
