mod comparison;

pub use comparison::{
    ComparisonRun, ConfidenceScale, EngineResult, EngineStatus, Recognition,
};
