// Copyright (C) 2022 the ITK authors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/./

use gl::types::{GLint, GLuint};
use thiserror::Error;

use crate::{
	device::{Device, SharedDevice},
	shader::ShaderProgram,
};


#[derive(Debug, Error, PartialEq, Eq)]
pub enum UniformError {
	#[error("uniform `{0}` is not active in the program")]
	UnknownUniform(String),
}

/// A value that can be uploaded to a uniform location.
///
/// Only implemented for the shapes the device upload path supports, so
/// anything else is rejected at compile time.
pub trait UniformValue {
	/// Upload to `location` of the active program.
	fn upload(&self, device: &dyn Device, location: GLint);
}

impl UniformValue for glam::Mat4 {
	fn upload(&self, device: &dyn Device, location: GLint) {
		device.uniform_matrix4(location, bytemuck::cast_ref(self));
	}
}

impl UniformValue for [f32; 16] {
	fn upload(&self, device: &dyn Device, location: GLint) {
		device.uniform_matrix4(location, self);
	}
}

/// Resolved location of a named uniform in one program.
pub struct Uniform {
	device: SharedDevice,
	program: GLuint,
	name: String,
	// negative once taken
	location: GLint,
}

impl Uniform {
	/// Resolve `name` against the linked `program`.
	pub fn new(program: &ShaderProgram, name: &str) -> Result<Self, UniformError> {
		let location = match program.is_valid() {
			true => program.device().uniform_location(program.id(), name),
			false => -1,
		};
		if location < 0 {
			return Err(UniformError::UnknownUniform(name.to_owned()))
		}

		log::debug!("resolved uniform `{name}` of program {} at {location}", program.id());

		Ok(Self {
			device: program.device().clone(),
			program: program.id(),
			name: name.to_owned(),
			location,
		})
	}

	/// Upload `value`. The owning program must be the active one.
	///
	/// # PANICS
	/// * in checked builds, if the owning program is not active
	pub fn set_data<V: UniformValue + ?Sized>(&self, value: &V) {
		ensure_valid!(self.is_valid(), "uniform");
		if crate::CHECKED && self.device.current_program() != self.program {
			panic!(
				"contract violation: uniform `{}` set while program {} is not active",
				self.name, self.program
			);
		}

		value.upload(&*self.device, self.location);
	}

	#[inline]
	pub fn name(&self) -> &str {
		&self.name
	}

	#[inline]
	pub fn location(&self) -> GLint {
		self.location
	}

	#[inline]
	pub fn is_valid(&self) -> bool {
		self.location >= 0
	}

	/// Move the resolved location out, leaving `self` invalid.
	pub fn take(&mut self) -> Self {
		Uniform {
			device: self.device.clone(),
			program: self.program,
			name: self.name.clone(),
			location: std::mem::replace(&mut self.location, -1),
		}
	}
}
