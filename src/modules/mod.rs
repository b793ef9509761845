pub mod books;

use std::sync::Arc;

use lectern_kernel::ModuleRegistry;
use lectern_store::BookStore;

/// Register all project modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, store: Arc<dyn BookStore>) {
    registry.register(books::create_module(store));
}
