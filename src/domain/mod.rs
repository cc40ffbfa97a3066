//! Domain layer types shared by the HTTP surface and the highlighting pipeline.

pub mod descriptor;
pub mod highlight;
