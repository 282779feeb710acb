//! Service-layer building blocks: token issuing, media storage, and
//! placeholder image assignment.

pub mod media;
pub mod placeholders;
pub mod token;
