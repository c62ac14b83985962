// Copyright (C) 2022 the ITK authors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/./

use std::rc::Rc;

use gl::types::{GLenum, GLint, GLsizei, GLuint};

pub use self::native::{DeviceInitError, GlDevice};

mod debug;
mod native;
#[cfg(test)]
pub(crate) mod recording;

/// Device shared by every resource created against it.
///
/// `Rc` keeps resources on the thread that owns the GL context.
pub type SharedDevice = Rc<dyn Device>;

/// The GL entry points used by the resource wrappers.
///
/// Handles are raw GL object names, `0` is never a valid object.
/// Enum arguments take raw GL constants (`gl::ARRAY_BUFFER`, ...).
pub trait Device {
	fn gen_buffer(&self) -> GLuint;
	fn delete_buffer(&self, buffer: GLuint);
	fn bind_buffer(&self, target: GLenum, buffer: GLuint);
	/// Allocate storage for the buffer bound to `target` and fill it with `data`.
	fn buffer_data(&self, target: GLenum, data: &[u8], usage: GLenum);

	/// Returns 0 if the shader object could not be created.
	fn create_shader(&self, ty: GLenum) -> GLuint;
	fn shader_source(&self, shader: GLuint, source: &str);
	fn compile_shader(&self, shader: GLuint);
	fn shader_compile_status(&self, shader: GLuint) -> bool;
	fn shader_info_log(&self, shader: GLuint) -> String;
	fn delete_shader(&self, shader: GLuint);

	/// Returns 0 if the program object could not be created.
	fn create_program(&self) -> GLuint;
	fn attach_shader(&self, program: GLuint, shader: GLuint);
	fn detach_shader(&self, program: GLuint, shader: GLuint);
	fn link_program(&self, program: GLuint);
	fn program_link_status(&self, program: GLuint) -> bool;
	fn program_info_log(&self, program: GLuint) -> String;
	fn use_program(&self, program: GLuint);
	fn delete_program(&self, program: GLuint);
	/// Name of the active program, 0 if none.
	fn current_program(&self) -> GLuint;

	fn gen_vertex_array(&self) -> GLuint;
	fn delete_vertex_array(&self, vertex_array: GLuint);
	fn bind_vertex_array(&self, vertex_array: GLuint);
	/// Name of the bound vertex array, 0 if none.
	fn vertex_array_binding(&self) -> GLuint;

	/// Location of an active vertex input, negative if there is none.
	fn attrib_location(&self, program: GLuint, name: &str) -> GLint;
	fn vertex_attrib_pointer(
		&self,
		location: GLuint,
		components: GLint,
		ty: GLenum,
		normalized: bool,
		stride: GLsizei,
		offset: usize,
	);
	fn enable_vertex_attrib_array(&self, location: GLuint);

	/// Location of an active uniform, negative if there is none.
	fn uniform_location(&self, program: GLuint, name: &str) -> GLint;
	/// Upload a column-major 4x4 matrix to the active program.
	fn uniform_matrix4(&self, location: GLint, value: &[f32; 16]);

	/// Draw `count` indices from the bound element buffer starting at byte `offset`.
	fn draw_elements(&self, mode: GLenum, count: GLsizei, ty: GLenum, offset: usize);

	fn viewport(&self, x: GLint, y: GLint, width: GLsizei, height: GLsizei);
	fn clear_color(&self, color: [f32; 4]);
	fn clear(&self, mask: GLenum);
}
