mod classified_record;

pub use classified_record::{ClassifiedRecord, MarkerStatus};
