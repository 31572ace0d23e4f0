//! Operator capabilities of a simulated controller.
//!
//! A controller that cannot force values holds `Forcing::Disabled`, which carries no force table at all: there is
//! nothing to write into, so forcing on such a controller cannot happen by construction.

use dashmap::DashMap;

/// Forced values of one controller, path → override
#[derive(Debug, Default)]
pub struct ForceTable {
    values: DashMap<String, f64>,
}

impl ForceTable {
    pub fn new() -> Self {
        Self { values: DashMap::new() }
    }

    pub fn force(&self, path: &str, value: f64) {
        self.values.insert(path.to_string(), value);
    }

    /// Removes the override for `path`. Returns whether one was present.
    pub fn unforce(&self, path: &str) -> bool {
        self.values.remove(path).is_some()
    }

    pub fn get(&self, path: &str) -> Option<f64> {
        self.values.get(path).map(|value| *value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

#[derive(Debug)]
pub enum Forcing {
    Enabled(ForceTable),
    Disabled,
}

impl Forcing {
    pub fn new(enabled: bool) -> Self {
        if enabled {
            Forcing::Enabled(ForceTable::new())
        } else {
            Forcing::Disabled
        }
    }

    pub fn table(&self) -> Option<&ForceTable> {
        match self {
            Forcing::Enabled(table) => Some(table),
            Forcing::Disabled => None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Forcing::Enabled(_))
    }
}

/// Whether the controller answers diagnostic queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticsAccess {
    Enabled,
    Disabled,
}

impl DiagnosticsAccess {
    pub fn new(enabled: bool) -> Self {
        if enabled {
            DiagnosticsAccess::Enabled
        } else {
            DiagnosticsAccess::Disabled
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, DiagnosticsAccess::Enabled)
    }
}
