//! MODE change sets.
//!
//! Both user-status modes (`+o nick`) and channel flags (`+m`) arrive in the
//! same MODE line; [`ModeChangeSet::parse`] splits them into an ordered list
//! of [`ModeChange`]s, and the [`ModeClass`] of each decides which listener
//! callback it is reported through.

mod parse;
mod types;

pub use self::parse::ModeChangeSet;
pub use self::types::{ModeArity, ModeChange, ModeClass, Sign};
