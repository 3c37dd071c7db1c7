//! Types shared between the tiering console core and its front ends.

pub mod domain;
pub mod error;
pub mod protocol;
