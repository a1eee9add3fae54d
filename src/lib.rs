//! Newtonian flight core for an asteroid-field gate race.
//!
//! [`RaceSession`] steps one spacecraft through a [`Course`] without any
//! engine around it; [`plugins::RacePlugin`] runs the same pipeline as Bevy
//! systems. Courses come from the shared JSON schema in [`course`] and are
//! authored with [`designer::CourseEditor`].

pub mod components;
pub mod course;
pub mod designer;
pub mod plugins;
pub mod resources;
pub mod session;
pub mod systems;
pub mod utils;

pub use components::{
    GateEvent, GateEventKind, PilotInput, RaceProgress, RaceStatus, RigidBodyState,
};
pub use course::{load_course, load_course_file, save_course, save_course_file, Course};
pub use designer::{CourseEditor, ObjectRef};
pub use resources::{GateOrderPolicy, SimulationConfig, SpacecraftConfig};
pub use session::{RaceSession, StepResult, StepWarning, Telemetry};
pub use utils::{ConfigError, EditError, LoadError, SimError};
