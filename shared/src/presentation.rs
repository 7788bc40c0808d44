//! Fire-and-forget requests from the simulation to the presentation layer.

use std::time::Duration;

pub const ANOMALY_TEXT: &str = "¿QUÉ COJONES?";
pub const STAIRS_WARNING_TEXT: &str = "no creo que sea seguro ir ahi...";
pub const INTRO_TEXT: &str = "¿qué?... ¿dónde estoy?...";
pub const DREAM_TEXT: &str = "esto tiene que ser un sueño";
pub const PICKUP_TEXT: &str = "FOUND A SODA!";

pub const ANOMALY_VISIBLE: Duration = Duration::from_millis(3000);
pub const STAIRS_WARNING_VISIBLE: Duration = Duration::from_millis(6000);
pub const INTRO_VISIBLE: Duration = Duration::from_millis(11_500);
pub const DREAM_VISIBLE: Duration = Duration::from_millis(9000);
pub const PICKUP_VISIBLE: Duration = Duration::from_millis(2500);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Glitch,
    StairsBlock,
    Found,
}

/// On-screen dialogue boxes. Starting a line in a slot replaces whatever
/// that slot was showing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DialogueSlot {
    /// Intro, dream and warning lines.
    Narration,
    Anomaly,
}

impl DialogueSlot {
    /// Typewriter speed for the slot.
    pub fn char_interval(self) -> Duration {
        match self {
            DialogueSlot::Narration => Duration::from_millis(60),
            DialogueSlot::Anomaly => Duration::from_millis(50),
        }
    }

    /// How long before hiding the box starts fading, if it fades at all.
    pub fn fade_lead(self) -> Option<Duration> {
        match self {
            DialogueSlot::Narration => Some(Duration::from_millis(1500)),
            DialogueSlot::Anomaly => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hint {
    Interact,
    Inspect,
    InspectOrCollect,
    LookCloser,
}

impl Hint {
    pub fn text(self) -> &'static str {
        match self {
            Hint::Interact => "Y para interactuar",
            Hint::Inspect => "Y para inspeccionar",
            Hint::InspectOrCollect => "Y para inspeccionar\nX para tomar un refresco",
            Hint::LookCloser => "Y para mirar más de cerca",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PresentationRequest {
    PlaySound(SoundCue),
    ShowDialogue {
        slot: DialogueSlot,
        text: String,
        visible_for: Duration,
    },
    HideDialogue(DialogueSlot),
    /// Blank lines are `None` and their panel stays hidden.
    OpenInspect {
        description: Option<String>,
        bottom_text: Option<String>,
    },
    CloseInspect,
    ShowPickup {
        text: String,
        visible_for: Duration,
    },
}

impl PresentationRequest {
    pub fn dialogue(slot: DialogueSlot, text: &str, visible_for: Duration) -> Self {
        Self::ShowDialogue {
            slot,
            text: text.to_string(),
            visible_for,
        }
    }
}
