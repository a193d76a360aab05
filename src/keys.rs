use std::collections::HashMap;

use eframe::egui::Key;

use crate::layer::Layer;

/// Keys that toggle the first nine layers, in layer order.
pub const OVERLAY_KEYS: [Key; 9] = [
    Key::Num1,
    Key::Num2,
    Key::Num3,
    Key::Num4,
    Key::Num5,
    Key::Num6,
    Key::Num7,
    Key::Num8,
    Key::Num9,
];

/// Caller supplied actions bound to keys. They take precedence over overlay keys.
pub type KeyCallbacks = HashMap<Key, Box<dyn FnMut() + Send>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Callback,
    Toggled { layer: usize },
    Ignored,
}

pub fn overlay_index(key: Key) -> Option<usize> {
    OVERLAY_KEYS.iter().position(|k| *k == key)
}

pub fn dispatch_key(key: Key, callbacks: &mut KeyCallbacks, layers: &mut [Layer]) -> KeyOutcome {
    if let Some(callback) = callbacks.get_mut(&key) {
        callback();
        return KeyOutcome::Callback;
    }
    match overlay_index(key) {
        Some(index) if index < layers.len() => {
            layers[index].toggle();
            KeyOutcome::Toggled { layer: index }
        }
        _ => KeyOutcome::Ignored,
    }
}
