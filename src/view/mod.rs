//! Presentation adapters: one parameterized derive pipeline per widget,
//! plus the shared view lifecycle and session state. Rendering engines sit
//! behind these models; the adapters never touch a drawing surface.

pub mod map_view;
pub mod network_view;
mod session;
pub mod state;
pub mod timeline_view;
pub mod words_view;

pub use session::{find_by_name, SessionContext};
pub use state::{transition, Event, Phase, SideEffect};
