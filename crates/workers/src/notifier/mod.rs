mod log;
mod pagerduty;
mod routing;
mod sink;
mod slack;

pub use log::LogSink;
pub use pagerduty::PagerDutySink;
pub use routing::RoutingSink;
pub use sink::{AlertSink, NotifyError};
pub use slack::SlackSink;
