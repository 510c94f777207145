pub mod app;
pub mod config;
pub mod dataset;
pub mod error;
pub mod headless;
pub mod init;
pub mod logging;
pub mod session;
pub mod sink;
pub mod summary;
pub mod ui;
pub mod view;
pub mod worklist;

pub use dataset::{Dataset, Variant};
pub use session::{Choice, DecisionRecord, Outcome, Session};
pub use sink::{CsvFileSink, ResultSink};
pub use worklist::{generate, Worklist};
