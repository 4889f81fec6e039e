//! Edition Engine: compiles fill-in-the-blank newspaper editions and
//! schedules their blanks for play.
//!
//! Raw edition documents are compiled into articles of plain and fillable
//! segments. Blanks can bind a shared noun that other segments reference,
//! and the scheduler produces a randomized fill order that never asks for
//! a blank before the nouns it mentions have been chosen.

pub mod core;
pub mod schema;
