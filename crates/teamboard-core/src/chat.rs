use anyhow::{
  Result,
  anyhow
};
use chrono::{
  DateTime,
  Duration,
  TimeZone,
  Utc
};
use tracing::debug;
use uuid::Uuid;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum ChannelKind {
  Channel,
  Dm
}

#[derive(Debug, Clone)]
pub struct ChatChannel {
  pub id:           String,
  pub name:         String,
  pub kind:         ChannelKind,
  pub unread_count: usize
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
  pub id:        Uuid,
  pub author:    String,
  pub content:   String,
  pub timestamp: DateTime<Utc>,
  pub channel:   String
}

// Local chat state. Messages only
// exist in memory; there is no chat
// transport behind this.
#[derive(Debug, Default)]
pub struct ChatStore {
  channels: Vec<ChatChannel>,
  messages: Vec<ChatMessage>
}

impl ChatStore {
  #[must_use]
  pub fn seeded() -> Self {
    let base = Utc
      .with_ymd_and_hms(
        2025, 7, 10, 8, 30, 0
      )
      .single()
      .unwrap_or_else(Utc::now);

    let channels = vec![
      channel(
        "general",
        "general",
        ChannelKind::Channel,
        0
      ),
      channel(
        "project-updates",
        "project-updates",
        ChannelKind::Channel,
        3
      ),
      channel(
        "random",
        "random",
        ChannelKind::Channel,
        0
      ),
      channel(
        "dm-brian",
        "Brian Lee",
        ChannelKind::Dm,
        2
      ),
      channel(
        "dm-clara",
        "Clara Park",
        ChannelKind::Dm,
        0
      ),
      channel(
        "dm-erin",
        "Erin Jung",
        ChannelKind::Dm,
        1
      ),
    ];

    let messages = vec![
      message(
        "general",
        "Alice Kim",
        "Standup moves to 9:30 today.",
        base
      ),
      message(
        "general",
        "Brian Lee",
        "Works for me.",
        base + Duration::minutes(4)
      ),
      message(
        "project-updates",
        "Clara Park",
        "Design system tokens are \
         merged.",
        base + Duration::minutes(20)
      ),
      message(
        "project-updates",
        "David Choi",
        "Login API is on staging.",
        base + Duration::minutes(35)
      ),
      message(
        "project-updates",
        "Erin Jung",
        "Push setup starts tomorrow.",
        base + Duration::minutes(50)
      ),
      message(
        "dm-brian",
        "Brian Lee",
        "Got a minute to review the \
         homepage PR?",
        base + Duration::hours(1)
      ),
      message(
        "dm-brian",
        "Brian Lee",
        "No rush, end of day is fine.",
        base
          + Duration::hours(1)
          + Duration::minutes(2)
      ),
      message(
        "dm-erin",
        "Erin Jung",
        "Banner drafts are in the \
         shared folder.",
        base + Duration::hours(2)
      ),
    ];

    Self {
      channels,
      messages
    }
  }

  #[must_use]
  pub fn channels(
    &self
  ) -> Vec<&ChatChannel> {
    self
      .channels
      .iter()
      .filter(|entry| {
        entry.kind
          == ChannelKind::Channel
      })
      .collect()
  }

  #[must_use]
  pub fn direct_messages(
    &self
  ) -> Vec<&ChatChannel> {
    self
      .channels
      .iter()
      .filter(|entry| {
        entry.kind == ChannelKind::Dm
      })
      .collect()
  }

  #[must_use]
  pub fn messages(
    &self,
    channel: &str
  ) -> Vec<&ChatMessage> {
    let mut found: Vec<&ChatMessage> =
      self
        .messages
        .iter()
        .filter(|message| {
          message.channel == channel
        })
        .collect();
    found.sort_by_key(|message| {
      message.timestamp
    });
    found
  }

  // Opening a channel clears its
  // unread badge.
  pub fn open(
    &mut self,
    channel: &str
  ) -> Result<&ChatChannel> {
    let entry = self
      .channels
      .iter_mut()
      .find(|entry| {
        entry.id == channel
      })
      .ok_or_else(|| {
        anyhow!(
          "unknown chat channel \
           '{channel}'"
        )
      })?;
    entry.unread_count = 0;
    debug!(
      channel = %entry.id,
      "channel opened"
    );
    Ok(entry)
  }

  pub fn send(
    &mut self,
    channel: &str,
    author: &str,
    content: &str,
    now: DateTime<Utc>
  ) -> Result<&ChatMessage> {
    if !self
      .channels
      .iter()
      .any(|entry| entry.id == channel)
    {
      return Err(anyhow!(
        "unknown chat channel \
         '{channel}'"
      ));
    }
    self.messages.push(message(
      channel, author, content, now
    ));
    self
      .messages
      .last()
      .ok_or_else(|| {
        anyhow!(
          "message was not stored"
        )
      })
  }

  #[must_use]
  pub fn total_unread(&self) -> usize {
    self
      .channels
      .iter()
      .map(|entry| entry.unread_count)
      .sum()
  }
}

fn channel(
  id: &str,
  name: &str,
  kind: ChannelKind,
  unread_count: usize
) -> ChatChannel {
  ChatChannel {
    id: id.to_string(),
    name: name.to_string(),
    kind,
    unread_count
  }
}

fn message(
  channel: &str,
  author: &str,
  content: &str,
  timestamp: DateTime<Utc>
) -> ChatMessage {
  ChatMessage {
    id: Uuid::new_v4(),
    author: author.to_string(),
    content: content.to_string(),
    timestamp,
    channel: channel.to_string()
  }
}

#[cfg(test)]
mod tests {
  use chrono::{
    Duration,
    TimeZone,
    Utc
  };

  use super::ChatStore;

  #[test]
  fn seeded_channels_split_by_kind() {
    let store = ChatStore::seeded();
    assert_eq!(
      store.channels().len(),
      3
    );
    assert_eq!(
      store.direct_messages().len(),
      3
    );
    assert_eq!(store.total_unread(), 6);
  }

  #[test]
  fn opening_clears_unread_badge() {
    let mut store =
      ChatStore::seeded();
    store
      .open("project-updates")
      .expect("open channel");
    assert_eq!(store.total_unread(), 3);

    assert!(
      store.open("nope").is_err()
    );
  }

  #[test]
  fn messages_come_back_in_time_order()
  {
    let mut store =
      ChatStore::seeded();
    let late = Utc
      .with_ymd_and_hms(
        2025, 7, 10, 18, 0, 0
      )
      .single()
      .expect("valid time");
    store
      .send(
        "general",
        "Alice Kim",
        "Wrapping up for today.",
        late
      )
      .expect("send");
    store
      .send(
        "general",
        "Alice Kim",
        "Earlier note.",
        late - Duration::hours(12)
      )
      .expect("send");

    let messages =
      store.messages("general");
    for pair in messages.windows(2) {
      assert!(
        pair[0].timestamp
          <= pair[1].timestamp
      );
    }
    assert_eq!(
      messages
        .last()
        .expect("nonempty")
        .content,
      "Wrapping up for today."
    );
  }
}
