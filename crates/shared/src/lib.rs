//! Types shared between the challenge controller and the front-ends that render it.

pub mod domain;
pub mod error;
pub mod protocol;
