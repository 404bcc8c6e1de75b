pub mod evaluations;
pub mod probes;
