use hecs::World;
use log::debug;

use crate::{
    components::{Hand, HandMaterial, HandTint},
    resources::GameSettings,
};

/// Hand tint system
/// Walks through each hand with a `HandTint` request and writes its controller's colour,
/// scaled by the requested intensity, into the hand's emission. The request is then removed
/// so each hand is only tinted once.
pub fn hand_tint_system(world: &mut World, game_settings: &GameSettings) {
    let tinted = world
        .query_mut::<(&Hand, &HandTint, &mut HandMaterial)>()
        .into_iter()
        .map(|(entity, (hand, tint, material))| {
            let color = game_settings.hand_color(hand.handedness);
            material.use_emissive_intensity = false;
            material.emissive_factor = color * tint.emission_intensity;
            debug!("[HAND_TINT] Tinted {:?} hand {entity:?}", hand.handedness);
            entity
        })
        .collect::<Vec<_>>();

    for entity in tinted {
        let _ = world.remove_one::<HandTint>(entity);
    }
}
