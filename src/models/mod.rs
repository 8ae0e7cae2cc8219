pub mod answer_key;
pub mod loaders;
pub mod report;
pub mod section;
pub mod table;

pub use answer_key::{AnswerKey, ExpectedAnswer};
pub use loaders::{load_answer_key, parse_answer_key, KeyFormat};
pub use report::{
    GradedRow, GradedTable, GradingOutcome, IndicatorRow, IndicatorTable, Score, SectionReport,
    PERCENT_COLUMN, SCORE_COLUMN,
};
pub use section::{SectionColumns, SectionId};
pub use table::{CellValue, ResponseTable};
