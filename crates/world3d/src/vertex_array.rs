// Copyright (C) 2022 the ITK authors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/./

use gl::types::{GLsizei, GLuint};
use thiserror::Error;

use crate::{
	attribute::{GLtype, ShaderAttribute},
	buffer::{Buffer, BufferTarget},
	device::SharedDevice,
	shader::ShaderProgram,
};


#[derive(Debug, Error, PartialEq, Eq)]
pub enum VertexArrayError {
	#[error("index count must be positive, got {0}")]
	InvalidArgument(GLsizei),
	#[error("no index count was set before building the vertex array")]
	MissingIndexCount,
	#[error("attribute `{0}` is not an active input of the program")]
	UnknownAttribute(String),
	#[error("vertex array built against an invalid program")]
	InvalidProgram,
	#[error("buffer {0} is not an element array buffer and cannot hold indices")]
	NotAnIndexBuffer(GLuint),
}

/// Attribute bindings plus an index buffer, ready for an indexed draw.
///
/// Indices are 16-bit unsigned and drawn as a triangle list.
pub struct VertexArray {
	device: SharedDevice,
	vao: GLuint,
	index_count: GLsizei,
}

impl VertexArray {
	pub fn bind(&self) {
		ensure_valid!(self.is_valid(), "vertex array");
		self.device.bind_vertex_array(self.vao);
	}

	pub fn unbind(&self) {
		ensure_valid!(self.is_valid(), "vertex array");
		self.device.bind_vertex_array(0);
	}

	/// Draw `index_count` indices as triangles.
	///
	/// # PANICS
	/// * in checked builds, if this vertex array is not the bound one
	pub fn draw_triangles(&self) {
		ensure_valid!(self.is_valid(), "vertex array");
		if crate::CHECKED && self.device.vertex_array_binding() != self.vao {
			panic!("contract violation: vertex array {} drawn while not bound", self.vao);
		}

		self.device.draw_elements(gl::TRIANGLES, self.index_count, u16::GL_TYPE, 0);
	}

	#[inline]
	pub fn id(&self) -> GLuint {
		self.vao
	}

	#[inline]
	pub fn index_count(&self) -> GLsizei {
		self.index_count
	}

	#[inline]
	pub fn is_valid(&self) -> bool {
		self.vao != 0
	}

	/// Move the device vertex array out, leaving `self` invalid.
	pub fn take(&mut self) -> Self {
		log::debug!("moved vertex array {}", self.vao);

		VertexArray {
			device: self.device.clone(),
			vao: std::mem::take(&mut self.vao),
			index_count: std::mem::take(&mut self.index_count),
		}
	}

	pub fn release(&mut self) {
		if self.vao != 0 {
			log::debug!("deleting vertex array {}", self.vao);
			self.device.delete_vertex_array(std::mem::take(&mut self.vao));
		}
	}
}

impl Drop for VertexArray {
	fn drop(&mut self) {
		self.release();
	}
}

/// Collects attributes and an index buffer, then builds one [`VertexArray`].
///
/// ```ignore
/// let vao = program
/// 	.vertex_array_builder()
/// 	.attribute(ShaderAttribute::new::<f32>("position", &positions, 3))
/// 	.index_buffer(&indices)
/// 	.set_index_count(3)?
/// 	.build()?;
/// ```
pub struct VertexArrayBuilder<'a> {
	program: &'a ShaderProgram,
	attributes: Vec<ShaderAttribute<'a>>,
	index_buffer: Option<&'a Buffer>,
	index_count: Option<GLsizei>,
}

impl<'a> VertexArrayBuilder<'a> {
	pub fn new(program: &'a ShaderProgram) -> Self {
		Self {
			program,
			attributes: Vec::new(),
			index_buffer: None,
			index_count: None,
		}
	}

	/// Attributes are bound in the order they are added.
	pub fn attribute(&mut self, attribute: ShaderAttribute<'a>) -> &mut Self {
		self.attributes.push(attribute);
		self
	}

	/// `buffer` must target [`BufferTarget::ElementArray`], checked on [`Self::build`].
	pub fn index_buffer(&mut self, buffer: &'a Buffer) -> &mut Self {
		self.index_buffer = Some(buffer);
		self
	}

	pub fn set_index_count(&mut self, count: GLsizei) -> Result<&mut Self, VertexArrayError> {
		if count <= 0 {
			return Err(VertexArrayError::InvalidArgument(count))
		}

		self.index_count = Some(count);
		Ok(self)
	}

	/// Create the vertex array and bind every pending attribute into it.
	///
	/// Pending state is cleared whether or not building succeeds.
	/// Leaves no vertex array or buffer bound.
	pub fn build(&mut self) -> Result<VertexArray, VertexArrayError> {
		let attributes = std::mem::take(&mut self.attributes);
		let index_buffer = self.index_buffer.take();
		let index_count = self.index_count.take().ok_or(VertexArrayError::MissingIndexCount)?;

		if let Some(buffer) = index_buffer {
			if buffer.target() != BufferTarget::ElementArray {
				return Err(VertexArrayError::NotAnIndexBuffer(buffer.id()))
			}
		}

		ensure_valid!(
			self.program.is_valid(),
			"shader program",
			Err(VertexArrayError::InvalidProgram)
		);

		let device = self.program.device();

		// dropped (and deleted) if an attribute can't be bound
		let vertex_array = VertexArray {
			device: device.clone(),
			vao: device.gen_vertex_array(),
			index_count,
		};
		device.bind_vertex_array(vertex_array.vao);

		let result = Self::bind_attributes(device, self.program, &attributes).map(|()| {
			if let Some(index_buffer) = index_buffer {
				index_buffer.bind();
			}
		});

		device.bind_vertex_array(0);
		device.bind_buffer(gl::ARRAY_BUFFER, 0);
		device.bind_buffer(gl::ELEMENT_ARRAY_BUFFER, 0);

		result?;

		log::debug!(
			"built vertex array {} ({} attributes, {index_count} indices)",
			vertex_array.vao,
			attributes.len()
		);

		Ok(vertex_array)
	}

	/// # NOTES
	/// * the vertex array being built must be bound
	fn bind_attributes(
		device: &SharedDevice,
		program: &ShaderProgram,
		attributes: &[ShaderAttribute],
	) -> Result<(), VertexArrayError> {
		for attribute in attributes {
			let location = device.attrib_location(program.id(), attribute.name);
			if location < 0 {
				return Err(VertexArrayError::UnknownAttribute(attribute.name.to_owned()))
			}
			let location = location as GLuint;

			attribute.buffer.bind();
			device.vertex_attrib_pointer(
				location,
				attribute.components,
				attribute.ty.gl_type,
				attribute.normalized,
				attribute.stride,
				attribute.offset,
			);
			device.enable_vertex_attrib_array(location);
		}

		Ok(())
	}
}
