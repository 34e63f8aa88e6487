//! Channel membership.

use std::collections::BTreeMap;
use std::fmt;

use crate::casemap::IrcName;
use crate::mode::{ModeChange, Sign};

/// Privilege shown in front of a nickname in NAMES replies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sigil {
    #[default]
    None,
    Voice,
    HalfOp,
    Op,
}

impl Sigil {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '@' => Some(Sigil::Op),
            '%' => Some(Sigil::HalfOp),
            '+' => Some(Sigil::Voice),
            _ => None,
        }
    }

    /// Split `@nick` into `(Op, "nick")`.
    pub fn split(name: &str) -> (Self, &str) {
        let mut chars = name.chars();
        match chars.next().and_then(Sigil::from_char) {
            Some(sigil) => (sigil, chars.as_str()),
            None => (Sigil::None, name),
        }
    }

    /// The status mode granting this sigil.
    pub fn from_mode(mode: char) -> Option<Self> {
        match mode {
            'o' => Some(Sigil::Op),
            'h' => Some(Sigil::HalfOp),
            'v' => Some(Sigil::Voice),
            _ => None,
        }
    }

    pub fn as_char(self) -> Option<char> {
        match self {
            Sigil::None => None,
            Sigil::Voice => Some('+'),
            Sigil::HalfOp => Some('%'),
            Sigil::Op => Some('@'),
        }
    }
}

/// One user in a channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Member {
    pub nickname: String,
    pub sigil: Sigil,
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(c) = self.sigil.as_char() {
            write!(f, "{}", c)?;
        }
        f.write_str(&self.nickname)
    }
}

/// A joined channel and who is in it.
#[derive(Clone, Debug, Default)]
pub struct Channel {
    name: String,
    members: BTreeMap<IrcName, Member>,
}

impl Channel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a member, or update the sigil of an existing one.
    pub fn insert(&mut self, nickname: &str, sigil: Sigil) {
        self.members
            .entry(IrcName::from(nickname))
            .and_modify(|m| m.sigil = sigil)
            .or_insert_with(|| Member {
                nickname: nickname.to_string(),
                sigil,
            });
    }

    /// Add a member who just joined; an existing entry is left as is.
    pub fn join(&mut self, nickname: &str) {
        self.members
            .entry(IrcName::from(nickname))
            .or_insert_with(|| Member {
                nickname: nickname.to_string(),
                sigil: Sigil::None,
            });
    }

    pub fn remove(&mut self, nickname: &str) -> bool {
        self.members.remove(&IrcName::from(nickname)).is_some()
    }

    /// Rename a member, keeping their sigil.
    pub fn rename(&mut self, old: &str, new: &str) -> bool {
        let Some(mut member) = self.members.remove(&IrcName::from(old)) else {
            return false;
        };
        member.nickname = new.to_string();
        self.members.insert(IrcName::from(new), member);
        true
    }

    pub fn contains(&self, nickname: &str) -> bool {
        self.members.contains_key(&IrcName::from(nickname))
    }

    pub fn member(&self, nickname: &str) -> Option<&Member> {
        self.members.get(&IrcName::from(nickname))
    }

    /// Update a sigil from a `+o`/`-h`/`+v` change.
    ///
    /// Removing a status only clears the sigil it granted.
    pub fn apply_mode(&mut self, change: &ModeChange) {
        let (Some(granted), Some(nickname)) = (Sigil::from_mode(change.mode), &change.param)
        else {
            return;
        };
        let Some(member) = self.members.get_mut(&IrcName::from(nickname.as_str())) else {
            return;
        };
        match change.sign {
            Sign::Plus => member.sigil = member.sigil.max(granted),
            Sign::Minus if member.sigil == granted => member.sigil = Sigil::None,
            Sign::Minus => {}
        }
    }

    /// Members in case-insensitive nickname order.
    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
