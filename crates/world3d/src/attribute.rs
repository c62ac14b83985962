// Copyright (C) 2022 the ITK authors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/./

use gl::types::{GLenum, GLint, GLsizei};

use crate::buffer::Buffer;

/// Element type of a vertex attribute as the device sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeType {
	pub gl_type: GLenum,
	pub size: usize,
}

impl AttributeType {
	pub const fn of<T: GLtype>() -> Self {
		AttributeType {
			gl_type: T::GL_TYPE,
			size: std::mem::size_of::<T>(),
		}
	}
}

pub trait GLtype: Sized {
	const GL_TYPE: GLenum;
}

macro_rules! gl_types {
	($($type:ident($gltype:expr);)*) => {
		$(
			impl GLtype for $type {
				const GL_TYPE: GLenum = $gltype;
			}
		)*
	}
}

gl_types! {
	f64(gl::DOUBLE);
	f32(gl::FLOAT);

	u32(gl::UNSIGNED_INT);
	u16(gl::UNSIGNED_SHORT);
	u8(gl::UNSIGNED_BYTE);

	i32(gl::INT);
	i16(gl::SHORT);
	i8(gl::BYTE);
}

/// Describes how one named vertex input reads from a buffer.
///
/// Borrows its source buffer, it only lives for the duration of a
/// [`VertexArrayBuilder`](crate::VertexArrayBuilder) build.
#[derive(Clone, Copy)]
pub struct ShaderAttribute<'a> {
	pub name: &'a str,
	pub buffer: &'a Buffer,
	pub components: GLint,
	pub ty: AttributeType,
	pub normalized: bool,
	/// Bytes between consecutive elements, 0 for tightly packed.
	pub stride: GLsizei,
	/// Byte offset of the first element in `buffer`.
	pub offset: usize,
}

impl<'a> ShaderAttribute<'a> {
	/// Tightly packed, unnormalized attribute of `components` values of `T`
	/// starting at the beginning of `buffer`.
	pub fn new<T: GLtype>(name: &'a str, buffer: &'a Buffer, components: GLint) -> Self {
		ShaderAttribute {
			name,
			buffer,
			components,
			ty: AttributeType::of::<T>(),
			normalized: false,
			stride: 0,
			offset: 0,
		}
	}

	pub fn normalized(mut self, normalized: bool) -> Self {
		self.normalized = normalized;
		self
	}

	pub fn stride(mut self, stride: GLsizei) -> Self {
		self.stride = stride;
		self
	}

	pub fn offset(mut self, offset: usize) -> Self {
		self.offset = offset;
		self
	}
}
