//! IRC mode parsing.

use std::str::FromStr;

use crate::error::ModeParseError;

use super::types::{ModeArity, ModeChange, ModeClass, Sign};

/// An ordered list of mode changes, as they appeared on the wire.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModeChangeSet {
    changes: Vec<ModeChange>,
}

impl ModeChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the parameter text of a MODE line, e.g. `+o-v alice bob`.
    ///
    /// The text is split on whitespace. Each token that is not consumed as
    /// a parameter is read as mode characters: `+`/`-` set the sign for the
    /// rest of that token, and every known mode character becomes one
    /// change, taking the next unconsumed token when its arity demands it.
    /// Unknown characters are skipped and consume nothing.
    pub fn parse(input: &str) -> Result<Self, ModeParseError> {
        let tokens: Vec<&str> = input.split_whitespace().collect();
        let mut changes = Vec::new();
        let mut next = 0;

        while next < tokens.len() {
            let token = tokens[next];
            next += 1;
            let mut sign = None;

            for c in token.chars() {
                if let Some(s) = Sign::from_char(c) {
                    sign = Some(s);
                    continue;
                }
                let Some(arity) = ModeArity::of(c) else {
                    continue;
                };
                let sign = sign.ok_or(ModeParseError::MissingModeModifier { mode: c })?;
                let param = if arity.takes_param(sign) {
                    let param = tokens.get(next).ok_or(ModeParseError::MissingParameter {
                        sign: sign.as_char(),
                        mode: c,
                    })?;
                    next += 1;
                    Some(param.to_string())
                } else {
                    None
                };
                changes.push(ModeChange::new(sign, c, param));
            }
        }

        Ok(Self { changes })
    }

    /// Append a change.
    pub fn push(&mut self, change: ModeChange) {
        self.changes.push(change);
    }

    /// Builder form of `push(ModeChange::plus(..))`.
    pub fn add(mut self, mode: char, param: Option<&str>) -> Self {
        self.push(ModeChange::plus(mode, param));
        self
    }

    /// Builder form of `push(ModeChange::minus(..))`.
    pub fn remove(mut self, mode: char, param: Option<&str>) -> Self {
        self.push(ModeChange::minus(mode, param));
        self
    }

    /// Every change in the order it was pushed or parsed, so additions and
    /// removals stay interleaved as on the wire. Use [`removed`](Self::removed)
    /// and [`added`](Self::added) for the two groups separately.
    pub fn all(&self) -> &[ModeChange] {
        &self.changes
    }

    pub fn added(&self) -> impl Iterator<Item = &ModeChange> {
        self.changes.iter().filter(|c| c.sign == Sign::Plus)
    }

    pub fn removed(&self) -> impl Iterator<Item = &ModeChange> {
        self.changes.iter().filter(|c| c.sign == Sign::Minus)
    }

    /// Changes to a user's status in the channel, or to a list mask.
    pub fn user_modes(&self) -> impl Iterator<Item = &ModeChange> {
        self.of_class(ModeClass::User)
    }

    /// Changes to channel flags.
    pub fn channel_modes(&self) -> impl Iterator<Item = &ModeChange> {
        self.of_class(ModeClass::Channel)
    }

    fn of_class(&self, class: ModeClass) -> impl Iterator<Item = &ModeChange> {
        self.changes
            .iter()
            .filter(move |c| c.class() == Some(class))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

impl FromStr for ModeChangeSet {
    type Err = ModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl FromIterator<ModeChange> for ModeChangeSet {
    fn from_iter<T: IntoIterator<Item = ModeChange>>(iter: T) -> Self {
        Self {
            changes: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ModeChangeSet {
    type Item = &'a ModeChange;
    type IntoIter = std::slice::Iter<'a, ModeChange>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}
