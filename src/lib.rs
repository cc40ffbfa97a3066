//! Syntax highlighting microservice: resolves a lexer for a source snippet and
//! renders it as self-contained, inline-styled HTML.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
