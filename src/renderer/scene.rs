//! Per-frame snapshot of everything visible
//!
//! The snapshot is rebuilt from the game state after each tick. It holds
//! no references back into the simulation.

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};

use super::camera::Camera;
use super::instance::{Instance, InstanceKind, colors};
use crate::assets::{AssetRegistry, MeshTemplate};
use crate::effects::{BloomEffect, CrtEffect, EffectsPipeline, StarsEffect};
use crate::sim::GameState;

/// Half size of the deadline bar
const DEADLINE_HALF_EXTENTS: Vec3 = Vec3::new(1000.0, 0.2, 0.2);

/// Screen-space box for the 2D canvas host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub center: Vec2,
    pub half_size: Vec2,
    /// Roll in screen space (radians)
    pub angle: f32,
    pub color: [f32; 4],
    pub kind: InstanceKind,
}

/// Everything the host draws in one frame
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub instances: Vec<Instance>,
    pub stars: Vec<Vec3>,
    pub bloom: Option<BloomEffect>,
    pub crt: Option<CrtEffect>,
}

impl Scene {
    /// Snapshot the state and the enabled cosmetic passes
    pub fn capture(state: &GameState, assets: &AssetRegistry, effects: &EffectsPipeline) -> Self {
        let mut instances = Vec::with_capacity(
            2 + state.player.projectiles.len() + state.enemies_remaining(),
        );

        instances.push(Instance::new(
            InstanceKind::Deadline,
            Mat4::from_scale(DEADLINE_HALF_EXTENTS),
            colors::DEADLINE,
        ));

        let player = &state.player;
        instances.push(Instance::new(
            InstanceKind::Player,
            model_for(&assets.player, player.pos, Quat::from_rotation_z(player.lean)),
            assets.player.rgba(),
        ));

        for projectile in player.projectiles.iter().filter(|p| !p.deleted) {
            instances.push(Instance::new(
                InstanceKind::Projectile,
                model_for(&assets.projectile, projectile.pos, Quat::IDENTITY),
                assets.projectile.rgba(),
            ));
        }

        for formation in &state.formations {
            for enemy in &formation.members {
                let spin = Quat::from_rotation_y(enemy.rotation);
                instances.push(Instance::new(
                    InstanceKind::Enemy,
                    model_for(&assets.enemy, formation.world_pos(enemy), spin),
                    assets.enemy.rgba(),
                ));
            }
        }

        Self {
            instances,
            stars: effects
                .get::<StarsEffect>()
                .map(|s| s.stars.clone())
                .unwrap_or_default(),
            bloom: effects.get::<BloomEffect>().copied(),
            crt: effects.get::<CrtEffect>().copied(),
        }
    }

    pub fn count(&self, kind: InstanceKind) -> usize {
        self.instances
            .iter()
            .filter(|i| i.kind() == Some(kind))
            .count()
    }

    /// Project every instance to screen space, back to front
    pub fn sprites(&self, camera: &Camera) -> Vec<Sprite> {
        let mut sprites: Vec<(f32, Sprite)> = self
            .instances
            .iter()
            .filter_map(|instance| {
                let kind = instance.kind()?;
                let model = instance.model();
                let center_world = model.w_axis.truncate();
                let center = camera.project(center_world)?;
                // Screen size from the projected model x and z axes
                let edge_x = camera.project(center_world + model.x_axis.truncate())?;
                let edge_z = camera.project(center_world + model.z_axis.truncate())?;
                let half_size = Vec2::new((edge_x - center).length(), (edge_z - center).length())
                    .max(Vec2::splat(1.0));
                let angle = (edge_x.y - center.y).atan2(edge_x.x - center.x);
                let sprite = Sprite {
                    center,
                    half_size,
                    angle,
                    color: instance.color,
                    kind,
                };
                Some((center_world.z, sprite))
            })
            .collect();
        sprites.sort_by(|a, b| a.0.total_cmp(&b.0));
        sprites.into_iter().map(|(_, s)| s).collect()
    }

    /// Visible stars in screen space
    pub fn star_points(&self, camera: &Camera) -> Vec<Vec2> {
        self.stars
            .iter()
            .filter_map(|&star| camera.project(star))
            .collect()
    }
}

fn model_for(template: &MeshTemplate, pos: Vec3, extra: Quat) -> Mat4 {
    let base = Quat::from_euler(
        EulerRot::XYZ,
        template.rotation.x,
        template.rotation.y,
        template.rotation.z,
    );
    Mat4::from_scale_rotation_translation(
        template.half_extents * template.scale,
        extra * base,
        pos,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::BuiltinAssets;
    use crate::settings::Settings;
    use crate::sim::{TickInput, tick};
    use crate::tuning::Tuning;

    fn running_state() -> GameState {
        let mut state = GameState::new(3, Tuning::default());
        let mut events = Vec::new();
        let input = TickInput {
            shoot: true,
            now: 0.0,
            ..TickInput::default()
        };
        tick(&mut state, &input, &mut events);
        state
    }

    #[test]
    fn test_capture_counts() {
        let state = running_state();
        let assets = AssetRegistry::load(&BuiltinAssets).unwrap();
        let scene = Scene::capture(&state, &assets, &EffectsPipeline::new());

        assert_eq!(scene.count(InstanceKind::Deadline), 1);
        assert_eq!(scene.count(InstanceKind::Player), 1);
        assert_eq!(scene.count(InstanceKind::Enemy), state.enemies_remaining());
        assert_eq!(
            scene.count(InstanceKind::Projectile),
            state.player.projectiles.len()
        );
        assert!(scene.stars.is_empty());
        assert!(scene.crt.is_none());
    }

    #[test]
    fn test_enemy_instances_follow_formation() {
        let state = running_state();
        let assets = AssetRegistry::load(&BuiltinAssets).unwrap();
        let scene = Scene::capture(&state, &assets, &EffectsPipeline::new());

        let formation = &state.formations[0];
        let first = formation.world_pos(&formation.members[0]);
        let enemy = scene
            .instances
            .iter()
            .find(|i| i.kind() == Some(InstanceKind::Enemy))
            .unwrap();
        assert!((enemy.position() - first).length() < 1e-4);
    }

    #[test]
    fn test_capture_includes_effects() {
        let state = running_state();
        let assets = AssetRegistry::load(&BuiltinAssets).unwrap();
        let effects = EffectsPipeline::from_settings(&Settings::default(), 9);
        let scene = Scene::capture(&state, &assets, &effects);
        assert_eq!(scene.stars.len(), 100);
        assert!(scene.bloom.is_some());
        assert!(scene.crt.is_some());
    }

    #[test]
    fn test_sprites_are_sorted_back_to_front() {
        let state = running_state();
        let assets = AssetRegistry::load(&BuiltinAssets).unwrap();
        let scene = Scene::capture(&state, &assets, &EffectsPipeline::new());
        let camera = Camera::new(1280.0, 720.0, 1.0);

        let sprites = scene.sprites(&camera);
        assert!(!sprites.is_empty());
        // Enemies are far away, the player is near
        assert_eq!(sprites[0].kind, InstanceKind::Enemy);
        assert_eq!(sprites.last().unwrap().kind, InstanceKind::Player);
        assert!(sprites.iter().all(|s| s.half_size.min_element() >= 1.0));
    }
}
