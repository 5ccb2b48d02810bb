pub mod compute;
pub mod dispatcher;
pub mod expression;
pub mod formula;
pub mod history;
pub mod lookup;
pub mod parse;
pub mod registry;
pub mod settings;

pub mod errors;

pub use dispatcher::{Evaluation, FormulaDispatcher};
pub use errors::{GhgError, GhgResult};
pub use formula::{Category, FormulaId, FormulaSpec, InputKind, InputSpec, OutputSpec};
pub use history::{HistoryObserver, ResultHistory};
pub use registry::FormulaRegistry;
pub use settings::Settings;
