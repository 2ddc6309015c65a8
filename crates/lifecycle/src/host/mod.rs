//! Host collaborator contracts
//!
//! The coordinators own no I/O. Every side effect goes through one of these
//! traits, implemented by the hosting client shell. [`mock`] provides
//! recording test doubles for all of them.

pub mod mock;
mod navigation;
mod network;
mod remote;
mod shell;
mod timer;
mod visibility;

pub use navigation::Navigator;
pub use network::{NetworkOperation, NetworkSubsystems};
pub use remote::{RemoteCommand, RemoteCommandClient};
pub use shell::{ClientShell, Localizer, ReloadMode, StaticCatalog};
pub use timer::{TickFuture, TickTask, TimerHandle, TimerService, TokioTimerService};
pub use visibility::{Visibility, VisibilityChannel, VisibilitySource};
