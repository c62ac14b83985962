// Copyright (C) 2022 the ITK authors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/./

use glam::{Mat4, Vec3};


/// View and projection transforms for the render engine.
///
/// Moves are queued and only reach the view matrix on [`Camera::update`].
#[derive(Debug, Clone)]
pub struct Camera {
	fov: f32,
	aspect_ratio: f32,
	near: f32,
	far: f32,
	projection: Mat4,
	view: Mat4,
	pending_translation: Vec3,
}

// move_x/set_x and friends differ only in the axis they touch
macro_rules! axis_methods {
	($($axis:ident),*) => {
		paste::paste! {
			$(
				#[doc = "Queue a move of the camera along " $axis "."]
				pub fn [<move_ $axis>](&mut self, delta: f32) {
					self.pending_translation.$axis -= delta;
				}

				#[doc = "Place the camera at `" $axis "` on that axis, bypassing pending moves."]
				pub fn [<set_ $axis>](&mut self, $axis: f32) {
					self.view.w_axis.$axis = -$axis;
				}
			)*
		}
	};
}

impl Camera {
	/// `fov` is the vertical field of view in radians.
	pub fn new(fov: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
		Self {
			fov,
			aspect_ratio,
			near,
			far,
			projection: Mat4::perspective_rh_gl(fov, aspect_ratio, near, far),
			view: Mat4::IDENTITY,
			pending_translation: Vec3::ZERO,
		}
	}

	axis_methods!(x, y, z);

	/// Queue a move of the camera by `(dx, dy, dz)`.
	///
	/// Moving the camera forward is moving the world backward,
	/// so the view translates by the negated delta.
	pub fn move_by(&mut self, dx: f32, dy: f32, dz: f32) {
		self.pending_translation -= Vec3::new(dx, dy, dz);
	}

	pub fn set_position(&mut self, x: f32, y: f32, z: f32) {
		self.set_x(x);
		self.set_y(y);
		self.set_z(z);
	}

	/// Fold queued moves into the view matrix.
	pub fn update(&mut self) {
		if self.pending_translation != Vec3::ZERO {
			self.view *= Mat4::from_translation(self.pending_translation);
			self.pending_translation = Vec3::ZERO;
		}
	}

	pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
		self.aspect_ratio = aspect_ratio;
		self.projection = Mat4::perspective_rh_gl(self.fov, aspect_ratio, self.near, self.far);
	}

	// TODO: rotate the view once input drives orientation
	pub fn roll(&mut self, _angle: f32) {}
	pub fn yaw(&mut self, _angle: f32) {}
	pub fn pitch(&mut self, _angle: f32) {}

	#[inline]
	pub fn projection(&self) -> &Mat4 {
		&self.projection
	}

	#[inline]
	pub fn view(&self) -> &Mat4 {
		&self.view
	}

	/// Projection matrix as 16 column-major floats.
	#[inline]
	pub fn projection_array(&self) -> &[f32; 16] {
		bytemuck::cast_ref(&self.projection)
	}

	/// View matrix as 16 column-major floats.
	#[inline]
	pub fn view_array(&self) -> &[f32; 16] {
		bytemuck::cast_ref(&self.view)
	}

	/// Moves queued since the last [`Camera::update`], in view space.
	#[inline]
	pub fn pending_translation(&self) -> Vec3 {
		self.pending_translation
	}

	#[inline]
	pub fn fov(&self) -> f32 {
		self.fov
	}

	#[inline]
	pub fn aspect_ratio(&self) -> f32 {
		self.aspect_ratio
	}

	#[inline]
	pub fn near(&self) -> f32 {
		self.near
	}

	#[inline]
	pub fn far(&self) -> f32 {
		self.far
	}
}
