use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Audio,
    Video,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Audio => f.write_str("microphone"),
            MediaKind::Video => f.write_str("camera"),
        }
    }
}

/// The local tracks currently being captured, at most one per kind.
#[derive(Debug)]
pub struct LocalMedia<T> {
    audio: Option<T>,
    video: Option<T>,
}

impl<T> Default for LocalMedia<T> {
    fn default() -> Self {
        Self {
            audio: None,
            video: None,
        }
    }
}

impl<T: Clone> LocalMedia<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self, kind: MediaKind) -> bool {
        self.slot(kind).is_some()
    }

    /// Audio first, then video.
    pub fn tracks(&self) -> Vec<T> {
        self.audio.iter().chain(self.video.iter()).cloned().collect()
    }

    pub fn set(&mut self, kind: MediaKind, track: T) -> Option<T> {
        self.slot_mut(kind).replace(track)
    }

    pub fn take(&mut self, kind: MediaKind) -> Option<T> {
        self.slot_mut(kind).take()
    }

    fn slot(&self, kind: MediaKind) -> &Option<T> {
        match kind {
            MediaKind::Audio => &self.audio,
            MediaKind::Video => &self.video,
        }
    }

    fn slot_mut(&mut self, kind: MediaKind) -> &mut Option<T> {
        match kind {
            MediaKind::Audio => &mut self.audio,
            MediaKind::Video => &mut self.video,
        }
    }
}

/// How local tracks land on a transport's existing senders, one sender per kind.
#[derive(Debug, PartialEq)]
pub struct SenderPlan<'a, T> {
    /// Track for each existing sender, in sender order. `None` silences it.
    pub replace: Vec<Option<&'a T>>,
    /// Tracks of a kind that has no sender yet.
    pub add: Vec<&'a T>,
}

pub fn plan_senders<'a, T, K: PartialEq>(
    sender_kinds: &[K],
    tracks: &'a [T],
    kind_of: impl Fn(&T) -> K,
) -> SenderPlan<'a, T> {
    let replace = sender_kinds
        .iter()
        .map(|kind| tracks.iter().find(|t| kind_of(*t) == *kind))
        .collect();
    let add = tracks
        .iter()
        .filter(|t| !sender_kinds.contains(&kind_of(*t)))
        .collect();

    SenderPlan { replace, add }
}
