use bevy::color::Alpha;
use bevy::prelude::*;

use super::palette::{center_color, object_color};
use crate::activity::ActivityPart;
use crate::app::activity::CountingActivity;
use crate::core::config::GameConfig;
use crate::gameplay::counting::{CountingPart, Face, ObjectId};
use crate::gameplay::GalaxyPart;

/// Root of every sprite belonging to one counting part.
#[derive(Component, Debug, Clone, Copy)]
pub struct PartRoot {
    pub part: usize,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct ObjectSprite {
    pub part: usize,
    pub id: ObjectId,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct LabelSprite {
    pub part: usize,
    pub id: ObjectId,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct CenterSprite {
    pub part: usize,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct ShineSprite {
    pub part: usize,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct FaceSprite {
    pub part: usize,
}

/// Shows the running counting part with plain coloured sprites.
pub struct ObjectSpritesPlugin;

impl Plugin for ObjectSpritesPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            PostUpdate,
            (
                spawn_part_sprites,
                (sync_roots, sync_objects, sync_labels, sync_center, sync_shine, sync_face),
            )
                .chain()
                .run_if(resource_exists::<CountingActivity>),
        );
    }
}

fn part_of(activity: &CountingActivity, part: usize) -> Option<&CountingPart<GalaxyPart>> {
    activity.session.sequencer().part(part)
}

fn world_scale(cfg: &Option<Res<GameConfig>>) -> f32 {
    cfg.as_ref()
        .map_or(60.0, |c| c.counting.world_scale)
        .max(f32::EPSILON)
}

fn spawn_part_sprites(
    mut commands: Commands,
    activity: Res<CountingActivity>,
    cfg: Option<Res<GameConfig>>,
    roots: Query<Entity, With<PartRoot>>,
    mut shown: Local<Option<(u32, usize)>>,
) {
    let sequencer = activity.session.sequencer();
    if sequencer.parts_count() == 0 {
        return;
    }
    let index = sequencer
        .current_part_index()
        .min(sequencer.parts_count() - 1);
    let key = (activity.rounds(), index);
    if *shown == Some(key) {
        return;
    }
    let Some(part) = part_of(&activity, index) else { return };
    if !part.core().in_progress() || part.objects().is_empty() {
        return;
    }
    for e in roots.iter() {
        commands.entity(e).despawn();
    }
    let ws = world_scale(&cfg);
    let center = part.center();
    commands
        .spawn((
            PartRoot { part: index },
            Transform::default(),
            Visibility::default(),
        ))
        .with_children(|root| {
            root.spawn((
                ShineSprite { part: index },
                Sprite::from_color(Color::WHITE.with_alpha(0.0), Vec2::splat(ws * 2.6)),
                Transform::from_xyz(0.0, 0.0, -0.2),
            ));
            root.spawn((
                CenterSprite { part: index },
                Sprite::from_color(center_color(center.visual(), 0.0), Vec2::splat(ws * 2.0)),
                Transform::from_xyz(0.0, 0.0, -0.1),
            ))
            .with_children(|c| {
                c.spawn((
                    FaceSprite { part: index },
                    Text2d::new(":|"),
                    TextFont {
                        font_size: ws * 0.6,
                        ..default()
                    },
                    TextColor(Color::BLACK),
                    Transform::from_xyz(0.0, 0.0, 0.05),
                ));
            });
            for (i, object) in part.objects().iter().enumerate() {
                let id = ObjectId(i);
                root.spawn((
                    ObjectSprite { part: index, id },
                    Sprite::from_color(object_color(object.visual()), Vec2::splat(ws * 0.9)),
                    Transform::from_scale(Vec3::ZERO),
                ))
                .with_children(|o| {
                    o.spawn((
                        LabelSprite { part: index, id },
                        Text2d::new(object.ordinal().to_string()),
                        TextFont {
                            font_size: ws * 0.5,
                            ..default()
                        },
                        TextColor(Color::WHITE),
                        Transform::from_xyz(0.0, 0.0, 0.05).with_scale(Vec3::ZERO),
                    ));
                });
            }
        });
    debug!(target: "counting", "spawned sprites for part {index}");
    *shown = Some(key);
}

fn sync_roots(activity: Res<CountingActivity>, mut q: Query<(&PartRoot, &mut Visibility)>) {
    for (root, mut vis) in q.iter_mut() {
        let enabled = part_of(&activity, root.part).is_some_and(|p| p.core().root_enabled());
        let want = if enabled {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        if *vis != want {
            *vis = want;
        }
    }
}

fn sync_objects(
    activity: Res<CountingActivity>,
    cfg: Option<Res<GameConfig>>,
    mut q: Query<(&ObjectSprite, &mut Transform)>,
) {
    let ws = world_scale(&cfg);
    for (sprite, mut tf) in q.iter_mut() {
        let Some(object) = part_of(&activity, sprite.part).and_then(|p| p.object(sprite.id)) else {
            continue;
        };
        tf.translation = Vec3::new(
            object.position.x * ws,
            object.position.y * ws,
            object.position.z,
        );
        tf.rotation = Quat::from_rotation_z(object.rotation.to_radians());
        tf.scale = Vec3::splat(object.scale);
    }
}

fn sync_labels(activity: Res<CountingActivity>, mut q: Query<(&LabelSprite, &mut Transform)>) {
    for (label, mut tf) in q.iter_mut() {
        let Some(object) = part_of(&activity, label.part).and_then(|p| p.object(label.id)) else {
            continue;
        };
        tf.scale = Vec3::splat(object.label_scale);
    }
}

fn sync_center(
    activity: Res<CountingActivity>,
    mut q: Query<(&CenterSprite, &mut Transform, &mut Sprite)>,
) {
    for (c, mut tf, mut sprite) in q.iter_mut() {
        let Some(part) = part_of(&activity, c.part) else { continue };
        let center = part.center();
        tf.scale = Vec3::splat(center.scale);
        tf.rotation = Quat::from_rotation_z(center.rotation.to_radians());
        sprite.color = center_color(center.visual(), center.fill);
    }
}

fn sync_shine(activity: Res<CountingActivity>, mut q: Query<(&ShineSprite, &mut Sprite)>) {
    for (s, mut sprite) in q.iter_mut() {
        let Some(part) = part_of(&activity, s.part) else { continue };
        sprite.color = Color::WHITE.with_alpha(part.center().shine_alpha * 0.6);
    }
}

fn sync_face(activity: Res<CountingActivity>, mut q: Query<(&FaceSprite, &mut Text2d)>) {
    for (f, mut text) in q.iter_mut() {
        let Some(part) = part_of(&activity, f.part) else { continue };
        let face = match part.center().face {
            Face::Neutral => ":|",
            Face::Happy => ":D",
        };
        if text.0 != face {
            text.0 = face.to_string();
        }
    }
}
