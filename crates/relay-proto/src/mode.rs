//! Mode flag sets for users, channel members and channels.
//!
//! Each set is a small bit field with one mode letter per flag, combined
//! with `|` and tested with [`contains`](UserModes::contains).

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use crate::error::{ProtocolError, Result};

macro_rules! mode_flags {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $(
                $(#[$flag_meta:meta])*
                const $flag:ident = $bit:expr, $letter:literal;
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $name(u8);

        impl $name {
            /// No flags set.
            pub const NONE: Self = Self(0);
            $(
                $(#[$flag_meta])*
                pub const $flag: Self = Self($bit);
            )*

            const ALL: &'static [(Self, char)] = &[$((Self::$flag, $letter)),*];

            /// Raw bit representation.
            #[inline]
            pub const fn bits(self) -> u8 {
                self.0
            }

            /// True when no flag is set.
            #[inline]
            pub const fn is_empty(self) -> bool {
                self.0 == 0
            }

            /// True when every flag in `other` is also set in `self`.
            #[inline]
            pub const fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }

            /// Set the flags in `other`.
            #[inline]
            pub fn insert(&mut self, other: Self) {
                self.0 |= other.0;
            }

            /// Clear the flags in `other`.
            #[inline]
            pub fn remove(&mut self, other: Self) {
                self.0 &= !other.0;
            }

            /// The flag for a mode letter, if this set defines one.
            pub fn from_char(letter: char) -> Option<Self> {
                Self::ALL
                    .iter()
                    .find(|(_, c)| *c == letter)
                    .map(|(flag, _)| *flag)
            }

            /// Every mode letter this set defines, in declaration order.
            pub fn letters() -> String {
                Self::ALL.iter().map(|(_, c)| *c).collect()
            }
        }

        impl BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }

        impl BitAnd for $name {
            type Output = Self;

            fn bitand(self, rhs: Self) -> Self {
                Self(self.0 & rhs.0)
            }
        }

        /// Renders as a mode string such as `+iw` (`+` when empty).
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("+")?;
                for (flag, letter) in Self::ALL {
                    if self.contains(*flag) {
                        write!(f, "{letter}")?;
                    }
                }
                Ok(())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }
    };
}

mode_flags! {
    /// Global user modes.
    pub struct UserModes {
        /// 'i' - hidden from queries
        const INVISIBLE = 1 << 0, 'i';
        /// 'o' - server operator
        const OPERATOR = 1 << 1, 'o';
        /// 'w' - receives wallops
        const WALLOPS = 1 << 2, 'w';
        /// 's' - receives server notices
        const SERVER_NOTICES = 1 << 3, 's';
    }
}

mode_flags! {
    /// Per-member modes a channel stores for each occupant.
    pub struct MemberModes {
        /// 'o' - channel operator
        const OPERATOR = 1 << 0, 'o';
        /// 'v' - voice
        const VOICE = 1 << 1, 'v';
    }
}

mode_flags! {
    /// Channel-wide modes.
    pub struct ChannelModes {
        /// 'i' - invite only
        const INVITE_ONLY = 1 << 0, 'i';
        /// 'm' - moderated
        const MODERATED = 1 << 1, 'm';
        /// 'n' - no messages from outside the channel
        const NO_EXTERNAL = 1 << 2, 'n';
        /// 't' - topic settable by operators only
        const TOPIC_LOCKED = 1 << 3, 't';
    }
}

impl MemberModes {
    /// Prefix shown before the nickname in a names list.
    pub fn names_prefix(self) -> &'static str {
        if self.contains(Self::OPERATOR) {
            "@"
        } else {
            ""
        }
    }
}

/// A mode change token such as `+i` or `-w`.
///
/// The first character is the sign; the rest are mode letters. Only `+`
/// marks an addition, any other sign character is treated as a removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModeDelta<'a> {
    /// True for `+` tokens.
    pub adding: bool,
    /// Mode letters following the sign.
    pub letters: &'a str,
}

impl<'a> ModeDelta<'a> {
    /// Split a token into sign and letters. Empty tokens are rejected.
    pub fn parse(token: &'a str) -> Result<Self> {
        let mut chars = token.chars();
        let sign = chars
            .next()
            .ok_or_else(|| ProtocolError::InvalidModeDelta(token.to_string()))?;
        Ok(Self {
            adding: sign == '+',
            letters: chars.as_str(),
        })
    }
}
