//! Typewriter dialogue boxes and the scripted narration.
//!
//! Two boxes exist: narration (intro, dream line and stair warnings share it)
//! and the anomaly line. Starting a line in a box cancels whatever it was
//! showing.

use bevy::prelude::*;
use metrito_shared::presentation::{DREAM_TEXT, DREAM_VISIBLE, INTRO_TEXT, INTRO_VISIBLE};
use metrito_shared::{DialogueSlot, PresentationRequest, Typewriter};
use std::time::Duration;

use crate::gameplay::Presentation;
use crate::states::GameState;
use crate::ui::styles::{ACCENT_RED, TEXT_COLOR};

/// Delay between the intro line and the dream line.
const DREAM_DELAY: Duration = Duration::from_secs(40);

pub struct DialoguePlugin;

impl Plugin for DialoguePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DialogueBoxes>();
        app.add_systems(
            OnEnter(GameState::Playing),
            (spawn_dialogue_boxes, start_narration),
        );
        app.add_systems(OnExit(GameState::Playing), despawn_dialogue_boxes);
        app.add_systems(
            Update,
            (apply_dialogue_requests, tick_dialogue, render_dialogue)
                .chain()
                .run_if(in_state(GameState::Playing)),
        );
    }
}

#[derive(Resource, Default)]
pub struct DialogueBoxes {
    narration: Typewriter,
    anomaly: Typewriter,
    /// Counts down to the dream line once the intro has played.
    dream: Option<Timer>,
    intro_played: bool,
}

impl DialogueBoxes {
    fn slot_mut(&mut self, slot: DialogueSlot) -> &mut Typewriter {
        match slot {
            DialogueSlot::Narration => &mut self.narration,
            DialogueSlot::Anomaly => &mut self.anomaly,
        }
    }

    fn slot(&self, slot: DialogueSlot) -> &Typewriter {
        match slot {
            DialogueSlot::Narration => &self.narration,
            DialogueSlot::Anomaly => &self.anomaly,
        }
    }

    fn start(&mut self, slot: DialogueSlot, text: &str, visible_for: Duration) {
        self.slot_mut(slot)
            .start(text, slot.char_interval(), visible_for, slot.fade_lead());
    }
}

/// Marker for a dialogue box and the slot it renders.
#[derive(Component)]
struct DialogueBox(DialogueSlot);

fn spawn_dialogue_boxes(mut commands: Commands) {
    for (slot, color, bottom) in [
        (DialogueSlot::Narration, TEXT_COLOR, 12.0),
        (DialogueSlot::Anomaly, ACCENT_RED, 30.0),
    ] {
        commands.spawn((
            DialogueBox(slot),
            Text::new(""),
            TextFont {
                font_size: 26.0,
                ..default()
            },
            TextColor(color.with_alpha(0.0)),
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Percent(bottom),
                width: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                ..default()
            },
            TextLayout::new_with_justify(Justify::Center),
            Visibility::Hidden,
            Pickable::IGNORE,
        ));
    }
}

fn despawn_dialogue_boxes(mut commands: Commands, query: Query<Entity, With<DialogueBox>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn();
    }
}

/// The intro plays the first time gameplay starts; the dream line follows.
fn start_narration(mut boxes: ResMut<DialogueBoxes>) {
    if boxes.intro_played {
        return;
    }
    boxes.intro_played = true;
    boxes.start(DialogueSlot::Narration, INTRO_TEXT, INTRO_VISIBLE);
    boxes.dream = Some(Timer::new(DREAM_DELAY, TimerMode::Once));
}

fn apply_dialogue_requests(mut presentation: MessageReader<Presentation>, mut boxes: ResMut<DialogueBoxes>) {
    for Presentation(request) in presentation.read() {
        match request {
            PresentationRequest::ShowDialogue {
                slot,
                text,
                visible_for,
            } => boxes.start(*slot, text, *visible_for),
            PresentationRequest::HideDialogue(slot) => boxes.slot_mut(*slot).cancel(),
            _ => {}
        }
    }
}

fn tick_dialogue(time: Res<Time>, mut boxes: ResMut<DialogueBoxes>) {
    let delta = time.delta();
    boxes.narration.tick(delta);
    boxes.anomaly.tick(delta);

    let dream_due = boxes.dream.as_mut().is_some_and(|timer| {
        timer.tick(delta);
        timer.just_finished()
    });
    if dream_due {
        boxes.dream = None;
        boxes.start(DialogueSlot::Narration, DREAM_TEXT, DREAM_VISIBLE);
    }
}

fn render_dialogue(
    time: Res<Time>,
    boxes: Res<DialogueBoxes>,
    mut query: Query<(&DialogueBox, &mut Text, &mut TextColor, &mut Visibility)>,
) {
    let fade = 1.0 - (-6.0 * time.delta_secs()).exp();
    for (dialogue_box, mut text, mut color, mut visibility) in query.iter_mut() {
        let typewriter = boxes.slot(dialogue_box.0);
        let Some(visible_text) = typewriter.visible_text() else {
            *visibility = Visibility::Hidden;
            color.0.set_alpha(0.0);
            continue;
        };

        if **text != visible_text {
            **text = visible_text;
        }
        *visibility = Visibility::Visible;

        let target = typewriter.opacity();
        // Lines appear at full opacity and fade out smoothly.
        let alpha = if target >= 1.0 {
            1.0
        } else {
            color.0.alpha() + (target - color.0.alpha()) * fade
        };
        color.0.set_alpha(alpha);
    }
}
