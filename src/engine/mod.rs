mod data;
mod mem_store;
mod persist;
mod store;

pub use data::{Deadline, ParsePriorityError, Priority, Task};
pub use mem_store::MemStore;
pub use persist::{load, load_file, save, save_file, PersistError};
pub use store::Store;
