//! Game simulation - state, actions, the tick batch and the async session

pub mod action;
pub mod scenario;
pub mod session;
pub mod state;
pub mod tick;

pub use action::{apply, Action, AssignTarget, Outcome, Transition};
pub use scenario::initial_state;
pub use session::Session;
pub use state::{GameState, Vault};
pub use tick::TickReport;
