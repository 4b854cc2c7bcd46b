pub mod api;
pub mod document;
pub mod model;
pub mod prompt;
pub mod service;
