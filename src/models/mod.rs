pub mod event;
pub mod loaders;
pub mod lookup;
pub mod numbers;

pub use event::LookupEvent;
pub use loaders::load_numbers_text;
pub use lookup::{LookupResult, LookupStatus, OutcomeRow, SavedResult, INVALID_DATA, TABLE_COLUMNS};
pub use numbers::parse_numbers;
