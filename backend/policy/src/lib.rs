pub mod annotate;
pub mod mode_target;
pub mod pipeline;
pub mod rules;
pub mod sweeper;

pub use annotate::{AnnotationStyle, DEFAULT_COLOUR_CODE};
pub use mode_target::{parse_mode_target, recover_mode_target};
pub use pipeline::FilterPipeline;
pub use rules::EventPolicy;
pub use sweeper::{effective_interval, run_sweep_loop, spawn_sweeper};
