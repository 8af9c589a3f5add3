pub mod hints;
pub mod mastery;
pub mod normalize;
pub mod queue;
pub mod timer;
