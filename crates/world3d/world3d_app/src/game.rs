// Copyright (C) 2022 the ITK authors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/./

use world3d::Camera;

/// Per-frame state driven by the main loop.
pub struct Game {
	camera: Camera,
}

impl Game {
	pub fn new(aspect_ratio: f32) -> Self {
		let mut camera = Camera::new(90f32.to_radians(), aspect_ratio, 0.1, 100.0);
		camera.set_position(0.0, 0.0, 3.0);

		Self { camera }
	}

	/// Advance one frame.
	pub fn tick(&mut self) {
		self.camera.update();
	}

	#[inline]
	pub fn camera(&self) -> &Camera {
		&self.camera
	}

	#[inline]
	pub fn camera_mut(&mut self) -> &mut Camera {
		&mut self.camera
	}
}
