//! Notification channel targets carried inside a [`Receiver`].
//!
//! Each channel is a validated value type that serializes to a
//! `(tag, attributes)` pair on the wire. The set of channels is closed:
//! the service only understands the five tags defined here.
//!
//! [`Receiver`]: crate::receiver::Receiver

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::error::InvalidArgument;

/// A DingTalk group robot: webhook address plus its signing secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Robot {
    pub webhook: String,
    pub secret: String,
}

impl Robot {
    pub fn new(webhook: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            webhook: webhook.into(),
            secret: secret.into(),
        }
    }

    fn validate(&self) -> Result<(), InvalidArgument> {
        if self.webhook.is_empty() {
            return Err(InvalidArgument::EmptyRobotField("webhook"));
        }
        if self.secret.is_empty() {
            return Err(InvalidArgument::EmptyRobotField("secret"));
        }
        Ok(())
    }
}

/// Merge semantics used by every `add_*` batch operation.
///
/// With `replace = false` this is an associative union over list indexes,
/// not an append: existing entries keep their positions and only incoming
/// entries whose index falls past the existing length are taken. Callers
/// depend on this union shape; do not change it to a plain append.
pub(crate) fn merge_indexed<T>(existing: &mut Vec<T>, incoming: Vec<T>, replace: bool) {
    if replace {
        *existing = incoming;
    } else {
        let skip = existing.len();
        existing.extend(incoming.into_iter().skip(skip));
    }
}

fn check_uid(uid: u64) -> Result<u64, InvalidArgument> {
    if uid == 0 {
        return Err(InvalidArgument::InvalidUid(uid));
    }
    Ok(uid)
}

fn check_uids(uids: impl IntoIterator<Item = u64>) -> Result<Vec<u64>, InvalidArgument> {
    uids.into_iter().map(check_uid).collect()
}

/// Phone-call notification to a list of user IDs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Phone {
    uids: Vec<u64>,
}

/// SMS notification to a list of user IDs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sms {
    uids: Vec<u64>,
}

/// Yach IM worker notification to a list of user IDs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YachWorker {
    uids: Vec<u64>,
}

macro_rules! uid_channel {
    ($name:ident) => {
        impl $name {
            /// Builds the channel from an initial uid list; every uid must
            /// be nonzero or the whole call fails.
            pub fn new(uids: impl IntoIterator<Item = u64>) -> Result<Self, InvalidArgument> {
                let mut channel = Self::default();
                channel.add_uids(uids, false)?;
                Ok(channel)
            }

            pub fn add_uid(&mut self, uid: u64) -> Result<&mut Self, InvalidArgument> {
                self.uids.push(check_uid(uid)?);
                Ok(self)
            }

            /// Adds a batch of uids; all-or-nothing, so a rejected uid
            /// leaves the channel unchanged. `replace` swaps the whole
            /// list, otherwise entries merge per the associative-union
            /// rule.
            pub fn add_uids(
                &mut self,
                uids: impl IntoIterator<Item = u64>,
                replace: bool,
            ) -> Result<&mut Self, InvalidArgument> {
                let filtered = check_uids(uids)?;
                merge_indexed(&mut self.uids, filtered, replace);
                Ok(self)
            }

            pub fn uids(&self) -> &[u64] {
                &self.uids
            }
        }
    };
}

uid_channel!(Phone);
uid_channel!(Sms);
uid_channel!(YachWorker);

/// DingTalk group-robot notification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DingGroup {
    robots: Vec<Robot>,
}

impl DingGroup {
    pub fn new(robots: impl IntoIterator<Item = Robot>) -> Result<Self, InvalidArgument> {
        let mut channel = Self::default();
        channel.add_robots(robots, false)?;
        Ok(channel)
    }

    pub fn add_robot(
        &mut self,
        webhook: impl Into<String>,
        secret: impl Into<String>,
    ) -> Result<&mut Self, InvalidArgument> {
        let robot = Robot::new(webhook, secret);
        robot.validate()?;
        self.robots.push(robot);
        Ok(self)
    }

    /// Adds a batch of robots; all-or-nothing per call.
    pub fn add_robots(
        &mut self,
        robots: impl IntoIterator<Item = Robot>,
        replace: bool,
    ) -> Result<&mut Self, InvalidArgument> {
        let filtered: Vec<Robot> = robots.into_iter().collect();
        for robot in &filtered {
            robot.validate()?;
        }
        merge_indexed(&mut self.robots, filtered, replace);
        Ok(self)
    }

    pub fn robots(&self) -> &[Robot] {
        &self.robots
    }
}

/// Webhook callback notification to a single URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Webhook {
    url: String,
}

impl Webhook {
    pub fn new(url: impl Into<String>) -> Result<Self, InvalidArgument> {
        let mut channel = Self { url: String::new() };
        channel.set_webhook(url)?;
        Ok(channel)
    }

    /// Replaces the callback URL. The value must parse as a URL and start
    /// with `http://` or `https://`.
    pub fn set_webhook(&mut self, url: impl Into<String>) -> Result<&mut Self, InvalidArgument> {
        let url = url.into();
        let accepted_scheme = url.starts_with("http://") || url.starts_with("https://");
        if !accepted_scheme || Url::parse(&url).is_err() {
            return Err(InvalidArgument::InvalidWebhook(url));
        }
        self.url = url;
        Ok(self)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// A typed notification target, one of the five channels the service
/// understands. Immutable once built; mutate the variant value and convert
/// again to change targeting.
#[derive(Debug, Clone, PartialEq)]
pub enum Channel {
    DingGroup(DingGroup),
    Phone(Phone),
    Sms(Sms),
    YachWorker(YachWorker),
    Webhook(Webhook),
}

impl Channel {
    /// Stable channel-name tag used as the key in the receiver's
    /// `channels` map.
    pub fn tag(&self) -> &'static str {
        match self {
            Channel::DingGroup(_) => "dinggroup",
            Channel::Phone(_) => "phone",
            Channel::Sms(_) => "sms",
            Channel::YachWorker(_) => "yachworker",
            Channel::Webhook(_) => "webhook",
        }
    }

    /// Normalized attribute payload serialized under the tag: a robot list
    /// for dinggroup, a uid list for the user-ID channels, a bare URL
    /// string for webhook.
    pub fn attributes(&self) -> Value {
        match self {
            Channel::DingGroup(ding) => serde_json::json!(ding.robots()),
            Channel::Phone(phone) => serde_json::json!(phone.uids()),
            Channel::Sms(sms) => serde_json::json!(sms.uids()),
            Channel::YachWorker(yach) => serde_json::json!(yach.uids()),
            Channel::Webhook(webhook) => Value::String(webhook.url().to_string()),
        }
    }
}

impl From<DingGroup> for Channel {
    fn from(channel: DingGroup) -> Self {
        Channel::DingGroup(channel)
    }
}

impl From<Phone> for Channel {
    fn from(channel: Phone) -> Self {
        Channel::Phone(channel)
    }
}

impl From<Sms> for Channel {
    fn from(channel: Sms) -> Self {
        Channel::Sms(channel)
    }
}

impl From<YachWorker> for Channel {
    fn from(channel: YachWorker) -> Self {
        Channel::YachWorker(channel)
    }
}

impl From<Webhook> for Channel {
    fn from(channel: Webhook) -> Self {
        Channel::Webhook(channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvalidArgument;

    #[test]
    fn phone_rejects_zero_uid_without_partial_mutation() {
        let mut phone = Phone::new([98664]).unwrap();
        let err = phone.add_uids([98665, 0], false).unwrap_err();
        assert!(matches!(err, InvalidArgument::InvalidUid(0)));
        // all-or-nothing: 98665 must not have been taken
        assert_eq!(phone.uids(), &[98664]);
    }

    #[test]
    fn phone_new_rejects_zero_uid() {
        assert!(Phone::new([98664, 98665, 0]).is_err());
    }

    #[test]
    fn uid_merge_is_associative_union_not_append() {
        let mut sms = Sms::new([1, 2]).unwrap();
        sms.add_uids([3, 4, 5], false).unwrap();
        // indexes 0 and 1 already occupied, only index 2 is taken
        assert_eq!(sms.uids(), &[1, 2, 5]);
    }

    #[test]
    fn uid_merge_replace_swaps_list() {
        let mut yach = YachWorker::new([1, 2]).unwrap();
        yach.add_uids([3], true).unwrap();
        assert_eq!(yach.uids(), &[3]);
    }

    #[test]
    fn ding_group_requires_webhook_and_secret() {
        let mut ding = DingGroup::default();
        let err = ding
            .add_robots([Robot::new("https://oapi.dingtalk.com/robot/send", "")], false)
            .unwrap_err();
        assert!(matches!(err, InvalidArgument::EmptyRobotField("secret")));
        assert!(ding.robots().is_empty());

        ding.add_robot("https://oapi.dingtalk.com/robot/send", "SEC_x")
            .unwrap();
        assert_eq!(ding.robots().len(), 1);
    }

    #[test]
    fn webhook_requires_http_scheme() {
        assert!(Webhook::new("https://hooks.example.com/cb").is_ok());
        assert!(Webhook::new("http://hooks.example.com/cb").is_ok());
        assert!(Webhook::new("ftp://hooks.example.com/cb").is_err());
        assert!(Webhook::new("not-a-url").is_err());
        assert!(Webhook::new("http://").is_err());
    }

    #[test]
    fn tags_are_stable() {
        let channels: Vec<Channel> = vec![
            DingGroup::default().into(),
            Phone::default().into(),
            Sms::default().into(),
            YachWorker::default().into(),
            Webhook::new("http://h.example/cb").unwrap().into(),
        ];
        let tags: Vec<&str> = channels.iter().map(Channel::tag).collect();
        assert_eq!(tags, vec!["dinggroup", "phone", "sms", "yachworker", "webhook"]);
    }

    #[test]
    fn attributes_match_wire_shapes() {
        let phone = Phone::new([98664, 98665]).unwrap();
        assert_eq!(
            Channel::from(phone).attributes(),
            serde_json::json!([98664, 98665])
        );

        let mut ding = DingGroup::default();
        ding.add_robot("https://oapi.dingtalk.com/robot/send", "SEC_x")
            .unwrap();
        assert_eq!(
            Channel::from(ding).attributes(),
            serde_json::json!([{"webhook": "https://oapi.dingtalk.com/robot/send", "secret": "SEC_x"}])
        );

        let webhook = Webhook::new("https://hooks.example.com/cb").unwrap();
        assert_eq!(
            Channel::from(webhook).attributes(),
            serde_json::json!("https://hooks.example.com/cb")
        );
    }
}
