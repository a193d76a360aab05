use std::collections::BTreeMap;

use log::info;

use crate::{
    error::Result,
    keys::KeyCallbacks,
    layer::Layer,
    window::{ViewerWindow, WindowId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Created,
    Updated,
}

/// Open windows keyed by id. Showing layers under an id that is already open
/// swaps that window's layers instead of opening a second window.
#[derive(Default)]
pub struct Registry {
    windows: BTreeMap<WindowId, ViewerWindow>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(
        &mut self,
        id: WindowId,
        layers: Vec<Layer>,
        callbacks: KeyCallbacks,
    ) -> Result<Registration> {
        match self.windows.get_mut(&id) {
            Some(window) => {
                window.update_layers(layers, callbacks)?;
                Ok(Registration::Updated)
            }
            None => {
                let window = ViewerWindow::new(id, layers, callbacks)?;
                self.windows.insert(id, window);
                Ok(Registration::Created)
            }
        }
    }

    pub fn close(&mut self, id: WindowId) -> Option<ViewerWindow> {
        let window = self.windows.remove(&id);
        if window.is_some() {
            info!("window {id} closed");
        }
        window
    }

    pub fn get(&self, id: WindowId) -> Option<&ViewerWindow> {
        self.windows.get(&id)
    }

    pub fn get_mut(&mut self, id: WindowId) -> Option<&mut ViewerWindow> {
        self.windows.get_mut(&id)
    }

    pub fn ids(&self) -> Vec<WindowId> {
        self.windows.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ViewerWindow> {
        self.windows.values()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{ArrayD, IxDyn};

    use super::*;
    use crate::error::ViewerError;

    fn layer(name: &str, shape: &[usize]) -> Layer {
        Layer::new(name, ArrayD::zeros(IxDyn(shape)))
    }

    #[test]
    fn reusing_an_id_updates_instead_of_duplicating() {
        let mut registry = Registry::new();
        assert_eq!(
            registry
                .show(0, vec![layer("a", &[3, 3])], KeyCallbacks::new())
                .unwrap(),
            Registration::Created
        );
        assert_eq!(
            registry
                .show(0, vec![layer("b", &[3, 3]), layer("c", &[3, 3])], KeyCallbacks::new())
                .unwrap(),
            Registration::Updated
        );
        assert_eq!(registry.len(), 1);
        let names: Vec<&str> = registry
            .get(0)
            .unwrap()
            .layers()
            .iter()
            .map(|l| l.name.as_str())
            .collect();
        assert_eq!(names, vec!["b", "c"]);
    }

    #[test]
    fn distinct_ids_open_distinct_windows() {
        let mut registry = Registry::new();
        registry
            .show(3, vec![layer("a", &[3, 3, 3])], KeyCallbacks::new())
            .unwrap();
        registry
            .show(1, vec![layer("a", &[3, 3])], KeyCallbacks::new())
            .unwrap();
        assert_eq!(registry.ids(), vec![1, 3]);
    }

    #[test]
    fn failed_creation_registers_nothing() {
        let mut registry = Registry::new();
        let result = registry.show(
            0,
            vec![layer("a", &[3, 3]), layer("b", &[3, 4])],
            KeyCallbacks::new(),
        );
        assert!(matches!(result, Err(ViewerError::ShapeMismatch { .. })));
        let result = registry.show(0, vec![layer("a", &[2, 2, 2, 2])], KeyCallbacks::new());
        assert!(matches!(
            result,
            Err(ViewerError::UnsupportedDimensionality { ndim: 4 })
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn close_removes_window() {
        let mut registry = Registry::new();
        registry
            .show(0, vec![layer("a", &[3, 3])], KeyCallbacks::new())
            .unwrap();
        assert!(registry.close(0).is_some());
        assert!(registry.close(0).is_none());
        assert!(registry.is_empty());
    }
}
