mod chained;
mod open;

pub use chained::{ChainStats, ChainedHashTable, DEFAULT_CAPACITY, DEFAULT_MAX_LOAD_FACTOR};
pub use open::{OpenAddressingHashTable, Search};
