//! Mode handlers: one per generation recipe.
//!
//! The combined mode composes the other two by explicit calls with
//! redirected sub-contexts, not by inheritance.

mod avatar;
mod combined;
mod presentation;
