//! Materialize statically-typed model classes from a graph of object schemas
//! composed allOf-style, with discriminator dispatch for runtime polymorphism.
//!
//! Pipeline, per schema node: register the (empty) class, compose ancestors
//! into backing anchors, flatten the visible property surface with explicit
//! access paths, wire discriminator dispatch, finalize validation. The
//! registry's register-before-build discipline is what makes diamond- and
//! cycle-shaped graphs resolvable.

pub mod cli;
pub mod diagnostics;
pub mod graph;
pub mod materialize;
pub mod model;
pub mod naming;
pub mod report;
pub mod typeinfo;
