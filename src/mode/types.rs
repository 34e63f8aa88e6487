//! Mode characters and single mode changes.

use std::fmt;

/// `+` or `-`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    /// Map `+`/`-`.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Sign::Plus),
            '-' => Some(Sign::Minus),
            _ => None,
        }
    }

    #[inline]
    pub fn as_char(self) -> char {
        match self {
            Sign::Plus => '+',
            Sign::Minus => '-',
        }
    }
}

/// When a mode consumes a parameter token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeArity {
    /// Both when set and when unset (`o`, `b`, ...).
    Always,
    /// Never (`m`, `t`, ...).
    Never,
    /// Only when set (`k`, `l`).
    OnSet,
}

impl ModeArity {
    /// Arity of a known mode character.
    pub fn of(mode: char) -> Option<Self> {
        match mode {
            'O' | 'o' | 'h' | 'v' | 'b' | 'e' | 'I' => Some(ModeArity::Always),
            'a' | 'i' | 'm' | 'n' | 'q' | 'p' | 's' | 'r' | 't' => Some(ModeArity::Never),
            'k' | 'l' => Some(ModeArity::OnSet),
            _ => None,
        }
    }

    #[inline]
    pub fn takes_param(self, sign: Sign) -> bool {
        match self {
            ModeArity::Always => true,
            ModeArity::Never => false,
            ModeArity::OnSet => sign == Sign::Plus,
        }
    }
}

/// Whether a mode is about a user in the channel or the channel itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModeClass {
    /// Status and list modes that name a user or mask.
    User,
    /// Channel flags.
    Channel,
}

impl ModeClass {
    pub fn of(mode: char) -> Option<Self> {
        match mode {
            'O' | 'o' | 'h' | 'v' | 'b' | 'e' | 'I' => Some(ModeClass::User),
            'a' | 'i' | 'm' | 'n' | 'q' | 'p' | 's' | 'r' | 't' | 'k' | 'l' => {
                Some(ModeClass::Channel)
            }
            _ => None,
        }
    }
}

/// One `±mode [param]` entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModeChange {
    pub sign: Sign,
    pub mode: char,
    pub param: Option<String>,
}

impl ModeChange {
    pub fn new(sign: Sign, mode: char, param: Option<String>) -> Self {
        Self { sign, mode, param }
    }

    /// `+mode [param]`
    pub fn plus(mode: char, param: Option<&str>) -> Self {
        Self::new(Sign::Plus, mode, param.map(str::to_string))
    }

    /// `-mode [param]`
    pub fn minus(mode: char, param: Option<&str>) -> Self {
        Self::new(Sign::Minus, mode, param.map(str::to_string))
    }

    #[inline]
    pub fn is_added(&self) -> bool {
        self.sign == Sign::Plus
    }

    /// `None` for characters outside both known sets.
    pub fn class(&self) -> Option<ModeClass> {
        ModeClass::of(self.mode)
    }

    /// Two-character flag such as `+o`.
    pub fn flag(&self) -> String {
        let mut flag = String::with_capacity(2);
        flag.push(self.sign.as_char());
        flag.push(self.mode);
        flag
    }
}

impl fmt::Display for ModeChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.sign.as_char(), self.mode)?;
        if let Some(param) = &self.param {
            write!(f, " {}", param)?;
        }
        Ok(())
    }
}
