//! Receiver targeting: which alarm groups and channels a report addresses.

use std::fmt;

use serde_json::{Map, Value};

use crate::channel::{merge_indexed, Channel};
use crate::error::InvalidArgument;

/// Combined addressing payload overriding a task's default routing:
/// server-side alarm groups by ID plus ad-hoc [`Channel`]s.
///
/// Built incrementally; every batch add is all-or-nothing and non-replace
/// adds merge with associative-union semantics (see
/// [`Channel`](crate::channel) for the index rule).
///
/// # Examples
///
/// ```rust
/// use dog_alarm::{Phone, Receiver};
///
/// let mut receiver = Receiver::new();
/// receiver.add_alarm_group(1).unwrap();
/// receiver.add_channel(Phone::new([98664]).unwrap());
/// let value = receiver.to_value();
/// assert_eq!(value["alarmgroup"], serde_json::json!([1]));
/// assert_eq!(value["channels"]["phone"], serde_json::json!([98664]));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Receiver {
    alarm_groups: Vec<u64>,
    channels: Vec<Channel>,
}

impl Receiver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a receiver from initial groups and channels in one call.
    pub fn with(
        alarm_groups: impl IntoIterator<Item = u64>,
        channels: impl IntoIterator<Item = Channel>,
    ) -> Result<Self, InvalidArgument> {
        let mut receiver = Self::new();
        receiver.add_alarm_groups(alarm_groups, false)?;
        receiver.add_channels(channels, false);
        Ok(receiver)
    }

    pub fn add_alarm_group(&mut self, group_id: u64) -> Result<&mut Self, InvalidArgument> {
        if group_id == 0 {
            return Err(InvalidArgument::InvalidAlarmGroup(group_id));
        }
        self.alarm_groups.push(group_id);
        Ok(self)
    }

    /// Adds a batch of alarm group IDs; a zero ID fails the whole call
    /// without touching the existing list.
    pub fn add_alarm_groups(
        &mut self,
        group_ids: impl IntoIterator<Item = u64>,
        replace: bool,
    ) -> Result<&mut Self, InvalidArgument> {
        let mut filtered = Vec::new();
        for group_id in group_ids {
            if group_id == 0 {
                return Err(InvalidArgument::InvalidAlarmGroup(group_id));
            }
            filtered.push(group_id);
        }

        merge_indexed(&mut self.alarm_groups, filtered, replace);
        Ok(self)
    }

    pub fn add_channel(&mut self, channel: impl Into<Channel>) -> &mut Self {
        self.channels.push(channel.into());
        self
    }

    pub fn add_channels(
        &mut self,
        channels: impl IntoIterator<Item = Channel>,
        replace: bool,
    ) -> &mut Self {
        let incoming: Vec<Channel> = channels.into_iter().collect();
        merge_indexed(&mut self.channels, incoming, replace);
        self
    }

    pub fn alarm_groups(&self) -> &[u64] {
        &self.alarm_groups
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Wire shape: `{"alarmgroup": [...], "channels": {tag: attrs, ...}}`.
    ///
    /// At most one slot per tag: a later channel with an already-seen tag
    /// overwrites the earlier value while the key keeps its first-seen
    /// position.
    pub fn to_value(&self) -> Value {
        let mut channels = Map::new();
        for channel in &self.channels {
            channels.insert(channel.tag().to_string(), channel.attributes());
        }

        let mut root = Map::new();
        root.insert(
            "alarmgroup".to_string(),
            serde_json::json!(self.alarm_groups),
        );
        root.insert("channels".to_string(), Value::Object(channels));
        Value::Object(root)
    }

    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }
}

impl fmt::Display for Receiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{DingGroup, Phone, Robot, Sms, Webhook};
    use crate::error::InvalidArgument;

    #[test]
    fn add_alarm_group_rejects_zero() {
        let mut receiver = Receiver::new();
        let err = receiver.add_alarm_group(0).unwrap_err();
        assert!(matches!(err, InvalidArgument::InvalidAlarmGroup(0)));
        assert!(receiver.alarm_groups().is_empty());
    }

    #[test]
    fn add_alarm_groups_is_all_or_nothing() {
        let mut receiver = Receiver::new();
        receiver.add_alarm_groups([1, 2], false).unwrap();
        assert!(receiver.add_alarm_groups([3, 0], false).is_err());
        assert_eq!(receiver.alarm_groups(), &[1, 2]);
    }

    #[test]
    fn alarm_group_merge_keeps_existing_positions() {
        let mut receiver = Receiver::new();
        receiver.add_alarm_groups([1, 2], false).unwrap();
        receiver.add_alarm_groups([3, 4, 5], false).unwrap();
        assert_eq!(receiver.alarm_groups(), &[1, 2, 5]);

        receiver.add_alarm_groups([9], true).unwrap();
        assert_eq!(receiver.alarm_groups(), &[9]);
    }

    #[test]
    fn to_value_round_trips_through_json() {
        let mut receiver = Receiver::new();
        receiver.add_alarm_groups([7, 3, 11], false).unwrap();
        receiver.add_channel(Phone::new([98664, 98665]).unwrap());
        receiver.add_channel(
            DingGroup::new([Robot::new("https://oapi.dingtalk.com/robot/send", "SEC_x")]).unwrap(),
        );

        let reparsed: Value = serde_json::from_str(&receiver.to_json()).unwrap();
        assert_eq!(reparsed, receiver.to_value());
        assert_eq!(reparsed["alarmgroup"], serde_json::json!([7, 3, 11]));
        let channels = reparsed["channels"].as_object().unwrap();
        let tags: Vec<&str> = channels.keys().map(String::as_str).collect();
        assert_eq!(tags, vec!["phone", "dinggroup"]);
    }

    #[test]
    fn duplicate_tag_last_value_wins_first_position_kept() {
        let mut receiver = Receiver::new();
        receiver.add_channel(Sms::new([1]).unwrap());
        receiver.add_channel(Webhook::new("https://hooks.example.com/cb").unwrap());
        receiver.add_channel(Sms::new([2, 3]).unwrap());

        let value = receiver.to_value();
        let channels = value["channels"].as_object().unwrap();
        let tags: Vec<&str> = channels.keys().map(String::as_str).collect();
        assert_eq!(tags, vec!["sms", "webhook"]);
        assert_eq!(channels["sms"], serde_json::json!([2, 3]));
    }

    #[test]
    fn display_is_json() {
        let mut receiver = Receiver::new();
        receiver.add_alarm_group(1).unwrap();
        assert_eq!(
            receiver.to_string(),
            r#"{"alarmgroup":[1],"channels":{}}"#
        );
    }

    #[test]
    fn with_builds_in_one_call() {
        let receiver = Receiver::with(
            [1, 2],
            [Channel::from(Phone::new([98664]).unwrap())],
        )
        .unwrap();
        assert_eq!(receiver.alarm_groups(), &[1, 2]);
        assert_eq!(receiver.channels().len(), 1);
    }
}
