//! Core content model, codec and interfaces.

pub mod codec;
pub mod component;
pub mod editor_component;
pub mod emoji;
pub mod event_router;
pub mod html;
pub mod input_event;
pub mod markup;
pub mod mention;
pub mod selection;
pub mod surface;
pub mod text;
