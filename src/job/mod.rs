mod invocation;
mod state;

pub use invocation::{Job, JobSummary};
pub use state::Stage;
