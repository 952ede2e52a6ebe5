// Resume filtering core: typed filter state, per-dimension predicates, the
// conjunctive engine, option extraction and the debounced session.
// Nothing below `handlers` performs I/O.

pub mod debounce;
pub mod engine;
pub mod handlers;
pub mod options;
pub mod predicates;
pub mod session;
pub mod sort;
pub mod state;

pub use options::FilterOptions;
pub use session::{FilterSession, FilteredView, DEFAULT_DEBOUNCE};
pub use state::{FilterDimension, FilterError, FilterState, FilterUpdate};
