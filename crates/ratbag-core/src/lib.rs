// ratbag-core: Device model, command grammar, and validation for ratbagctl.

pub mod action;
pub mod command;
pub mod error;
pub mod format;
pub mod grammar;
pub mod model;
pub mod service;
pub mod session;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::Mutation;
pub use error::{CoreError, ErrorKind, exit_code};
pub use service::{DeviceService, FixtureService, ServiceCall, ServiceError, StateFile};
pub use session::{Outcome, Session};

// Re-export model types at the crate root for ergonomics.
pub use action::{Action, ActionKind, Key, MacroEvent, SpecialAction};
pub use model::{
    Button, Color, ColorDepth, Device, EntityKind, Led, LedMode, LedType, Node, Profile,
    ProfileCapability, Resolution, ResolutionCapability,
};
