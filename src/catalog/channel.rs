//! Release channel selection

#[cfg(test)]
use mockall::automock;
use serde::Deserialize;

/// Distribution track that decides which catalog versions are served
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseChannel {
    #[default]
    Stable,
    Edge,
    Candidate,
}

impl ReleaseChannel {
    /// Returns the value sent as the `channel` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseChannel::Stable => "stable",
            ReleaseChannel::Edge => "edge",
            ReleaseChannel::Candidate => "candidate",
        }
    }
}

impl std::str::FromStr for ReleaseChannel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stable" => Ok(ReleaseChannel::Stable),
            "edge" => Ok(ReleaseChannel::Edge),
            "candidate" => Ok(ReleaseChannel::Candidate),
            _ => Err(()),
        }
    }
}

/// Source of the caller's release channel
#[cfg_attr(test, automock)]
pub trait ChannelSelector: Send + Sync {
    fn channel(&self) -> ReleaseChannel;
}

/// Channel fixed at construction, typically from configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfiguredChannel(ReleaseChannel);

impl ConfiguredChannel {
    pub fn new(channel: ReleaseChannel) -> Self {
        Self(channel)
    }
}

impl ChannelSelector for ConfiguredChannel {
    fn channel(&self) -> ReleaseChannel {
        self.0
    }
}
