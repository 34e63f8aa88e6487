//! Classification of received lines.

mod nom_parser;
mod params;

pub use self::nom_parser::{Action, Line, Numeric};
pub use self::params::{read_param, trim_colon};
