pub mod document;
pub mod export;
pub mod grouping;
pub mod model;
pub mod normalize;
pub mod path;
pub mod prompt_object;
pub mod reintegrate;
pub mod shots;

pub use document::{detect, DocumentKind, RawDocument};
pub use model::{DocumentView, NormalizedPromptEntry, PromptSlot, UnifiedModel};
pub use normalize::normalize;
