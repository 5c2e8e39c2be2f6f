//! Stateful coordination between the content model and a host surface.

pub mod debounce;
pub mod emit;
pub mod mention_resolver;
pub mod surface_controller;

pub use debounce::Debouncer;
pub use emit::EmitCoordinator;
pub use mention_resolver::{
    MentionPhase, MentionRequest, MentionResolver, MentionSearchState, SearchMention, SearchResult,
};
pub use surface_controller::{CaretMotion, SurfaceController};
