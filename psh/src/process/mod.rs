mod fork;
pub mod job;
pub mod redirect;
pub mod registry;
pub mod setup;
pub mod signal;
pub mod state;
pub mod wait;

pub use job::{Job, launch};
pub use redirect::Redirect;
pub use registry::{BackgroundRegistry, Completion};
pub use setup::{ChildSetup, FdRedirect, SetupStep};
pub use state::ProcessState;
