// This file is part of Counting Galaxy.
// Copyright (C) 2025 Adam and contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use bevy::prelude::*;

use super::activity::ActivityCorePlugin;
use super::auto_close::AutoClosePlugin;
use crate::interaction::pointer::PointerInputPlugin;
use crate::rendering::camera::CameraZoomPlugin;
use crate::rendering::sprites::ObjectSpritesPlugin;

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            ActivityCorePlugin,
            CameraZoomPlugin,
            ObjectSpritesPlugin,
            PointerInputPlugin,
            AutoClosePlugin,
        ));
    }
}
