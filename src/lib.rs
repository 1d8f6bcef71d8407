#![forbid(unsafe_code)]

pub mod catalog;
pub mod console;
pub mod ease;
pub mod effect;
pub mod engine;
pub mod error;
pub mod fade;
pub mod group;
pub mod input;
pub mod registry;
pub mod scene;
pub mod selection;
pub mod stage;

pub use console::{Console, Op, Signal};
pub use ease::{EaseFn, EaseKind};
pub use effect::{Effect, EffectKind};
pub use engine::Engine;
pub use error::{KaleidoError, KaleidoResult};
pub use fade::Fade;
pub use group::{Group, GroupKind};
pub use input::LineReader;
pub use registry::Registry;
pub use scene::Scene;
pub use selection::{Focus, Selection};
pub use stage::{Element, ElementId, MemoryStage, Placement, Stage};
