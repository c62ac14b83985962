// Copyright (C) 2022 the ITK authors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/./

use gl::types::{GLenum, GLuint};

use crate::device::SharedDevice;


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferTarget {
	/// Per-vertex attribute data
	Array,
	/// Vertex indices
	ElementArray,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BufferUsage {
	#[default]
	StaticDraw,
	DynamicDraw,
	StreamDraw,
}

impl BufferTarget {
	#[inline]
	pub fn gl_type(&self) -> GLenum {
		match self {
			Self::Array => gl::ARRAY_BUFFER,
			Self::ElementArray => gl::ELEMENT_ARRAY_BUFFER,
		}
	}
}

impl BufferUsage {
	#[inline]
	pub fn gl_type(&self) -> GLenum {
		match self {
			Self::StaticDraw => gl::STATIC_DRAW,
			Self::DynamicDraw => gl::DYNAMIC_DRAW,
			Self::StreamDraw => gl::STREAM_DRAW,
		}
	}
}

/// One block of device memory with its contents uploaded at creation.
pub struct Buffer {
	device: SharedDevice,
	target: BufferTarget,
	// 0 once taken or released
	gl_buffer: GLuint,
	size: usize,
}

impl Buffer {
	/// Create a buffer holding `data`.
	///
	/// The buffer is left unbound.
	pub fn new<T: bytemuck::Pod>(
		device: &SharedDevice,
		target: BufferTarget,
		data: &[T],
		usage: BufferUsage,
	) -> Self {
		let bytes = bytemuck::cast_slice::<T, u8>(data);

		let gl_buffer = device.gen_buffer();
		device.bind_buffer(target.gl_type(), gl_buffer);
		device.buffer_data(target.gl_type(), bytes, usage.gl_type());
		device.bind_buffer(target.gl_type(), 0);

		log::debug!("created {target:?} buffer {gl_buffer} ({} bytes)", bytes.len());

		Self {
			device: device.clone(),
			target,
			gl_buffer,
			size: bytes.len(),
		}
	}

	pub fn bind(&self) {
		ensure_valid!(self.is_valid(), "buffer");
		self.device.bind_buffer(self.target.gl_type(), self.gl_buffer);
	}

	/// Clear the binding of this buffer's target.
	pub fn unbind(&self) {
		ensure_valid!(self.is_valid(), "buffer");
		self.device.bind_buffer(self.target.gl_type(), 0);
	}

	/// Move the device buffer out, leaving `self` invalid.
	pub fn take(&mut self) -> Self {
		let gl_buffer = std::mem::take(&mut self.gl_buffer);
		log::debug!("moved {:?} buffer {gl_buffer}", self.target);

		Self {
			device: self.device.clone(),
			target: self.target,
			gl_buffer,
			size: std::mem::take(&mut self.size),
		}
	}

	/// Delete the device buffer now instead of on drop.
	pub fn release(&mut self) {
		if self.gl_buffer != 0 {
			log::debug!("deleting {:?} buffer {}", self.target, self.gl_buffer);
			self.device.delete_buffer(std::mem::take(&mut self.gl_buffer));
			self.size = 0;
		}
	}

	#[inline]
	pub fn is_valid(&self) -> bool {
		self.gl_buffer != 0
	}

	#[inline]
	pub fn id(&self) -> GLuint {
		self.gl_buffer
	}

	#[inline]
	pub fn target(&self) -> BufferTarget {
		self.target
	}

	/// Size of the device allocation in bytes.
	#[inline]
	pub fn size(&self) -> usize {
		self.size
	}
}

impl Drop for Buffer {
	fn drop(&mut self) {
		self.release();
	}
}

impl std::fmt::Debug for Buffer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Buffer")
			.field("target", &self.target)
			.field("id", &self.gl_buffer)
			.field("size", &self.size)
			.finish()
	}
}
