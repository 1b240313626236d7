pub mod aggregator;
pub mod board_catalog;
pub mod board_query;
pub mod item_creator;
pub mod translator;

pub use aggregator::{Aggregator, BoardFailure, ItemStream, SearchSummary};
pub use board_catalog::BoardCatalog;
pub use board_query::BoardQueryWorker;
pub use item_creator::ItemCreator;
pub use translator::translate;
