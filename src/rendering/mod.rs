pub mod memory;

// Re-export main types
pub use memory::{LayerOp, MemoryLayer, MemoryMapView};
