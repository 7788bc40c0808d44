//! Runs the shared simulation on the fixed timestep and forwards its
//! presentation requests to the rest of the client as messages.

use bevy::prelude::*;
use metrito_shared::{PresentationRequest, Simulation, WorldConfig};

use crate::input::AccumulatedInput;
use crate::states::GameState;

/// A presentation request emitted by the last simulation tick.
#[derive(Message, Clone, Debug)]
pub struct Presentation(pub PresentationRequest);

pub struct GameplayPlugin {
    pub config: WorldConfig,
}

impl Plugin for GameplayPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Simulation::new(self.config.clone()));
        app.add_message::<Presentation>();
        app.add_systems(
            FixedUpdate,
            run_simulation.run_if(in_state(GameState::Playing)),
        );
    }
}

fn run_simulation(
    time: Res<Time>,
    mut accumulated: ResMut<AccumulatedInput>,
    mut simulation: ResMut<Simulation>,
    mut writer: MessageWriter<Presentation>,
) {
    let input = accumulated.take_for_tick();
    for request in simulation.tick(&input, time.delta()) {
        writer.write(Presentation(request));
    }
}
