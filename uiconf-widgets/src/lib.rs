//! Builtin widgets: file manager, pivot grid and scheduler

pub mod common;
pub mod file_manager;
pub mod pivot_grid;
pub mod scheduler;

pub use common::*;
pub use file_manager::FileManager;
pub use pivot_grid::PivotGrid;
pub use scheduler::Scheduler;

use uiconf_core::{WidgetRegistry, register_widget};

/// Register every builtin widget kind
pub fn register_builtin(registry: &mut WidgetRegistry) {
    register_widget!(registry, FileManager);
    register_widget!(registry, PivotGrid);
    register_widget!(registry, Scheduler);
}

/// Registry holding the builtin widget kinds
pub fn builtin_registry() -> WidgetRegistry {
    let mut registry = WidgetRegistry::new();
    register_builtin(&mut registry);
    registry
}
