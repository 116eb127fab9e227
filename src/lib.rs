//! bookbind — decide whether a document build may run, which formats it
//! produces, and where the files land, before handing off to the converter.

pub mod args;
pub mod config;
pub mod error;
pub mod generate;
pub mod logging;
pub mod probe;
pub mod project;
