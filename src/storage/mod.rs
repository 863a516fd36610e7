/*!
 * Storage Module
 * Record store contracts and the in-memory reference implementation
 */

pub mod memory;
pub mod traits;

pub use memory::MemoryStore;
pub use traits::{RecordStore, StoreError, StoreResult, WriteScope};
