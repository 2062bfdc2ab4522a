pub mod logging;
pub mod metrics;

pub use logging::{init_logging, loggable_amount, mask_amount, LogConfig, LogFormat};
pub use metrics::{get_metrics, init_metrics, LatencyTimer, Metrics, METRICS};
