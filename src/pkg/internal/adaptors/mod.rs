pub mod jobs;
pub mod rubrics;
pub mod uploads;
