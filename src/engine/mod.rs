pub mod commit;
pub mod cost;
pub mod grouping;
pub mod partition;
pub mod sequence;
