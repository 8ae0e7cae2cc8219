pub mod aggregator;
pub mod column_classifier;
pub mod fetch_retrier;
pub mod grader;
pub mod partitioner;
pub mod result_writer;

pub use column_classifier::ColumnClassifier;
pub use fetch_retrier::FetchRetrier;
pub use grader::Grader;
pub use result_writer::ResultWriter;
