//! Cross-cutting helpers

pub mod logger;
pub mod time;
pub mod validation;
