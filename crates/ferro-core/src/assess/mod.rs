pub mod engine;
pub mod outcome;

pub use engine::{assess_one, assess_record, assess_records, LevyRates};
pub use outcome::{AssessedRecord, Assessment, LevyResult, LevyStatus};
