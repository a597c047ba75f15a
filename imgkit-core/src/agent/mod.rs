//! Session handling and tool dispatch

pub mod runner;
pub mod session;

pub use runner::{Runner, RunnerEvent, ToolOutput};
pub use session::{SessionHandle, SessionService};
