pub mod aggregator;
pub mod deleter;
pub mod events;
pub mod progress;
pub mod scanner;
pub mod size_probe;
