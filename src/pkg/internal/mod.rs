pub mod adaptors;
pub mod ai;
pub mod github;
pub mod pii;
pub mod pipeline;
pub mod queue;
pub mod storage;
pub mod worker;
