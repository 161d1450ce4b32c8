//! Channel name utilities.

/// Leading character that marks a target as a channel.
pub const CHANNEL_PREFIX: char = '#';

/// Extension trait for telling channel targets apart from nicknames.
pub trait ChannelExt {
    /// True when this target names a channel rather than a user.
    fn is_channel_name(&self) -> bool;
}

impl ChannelExt for str {
    fn is_channel_name(&self) -> bool {
        self.starts_with(CHANNEL_PREFIX)
    }
}

impl ChannelExt for String {
    fn is_channel_name(&self) -> bool {
        self.as_str().is_channel_name()
    }
}
