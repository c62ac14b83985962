// Copyright (C) 2022 the ITK authors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/./

use std::{
	ffi::{c_void, CStr, CString},
	marker::PhantomData,
};

use gl::types::{GLchar, GLenum, GLint, GLsizei, GLsizeiptr, GLuint};
use thiserror::Error;

use super::Device;

#[cfg(test)]
mod test;

#[derive(Debug, Error)]
pub enum DeviceInitError {
	#[error("could not resolve OpenGL entry points: {}", .0.join(", "))]
	MissingEntryPoints(Vec<&'static str>),
}

/// [`Device`] backed by the process-wide `gl` function pointers.
///
/// !Send, the context is only current on the thread that loaded it.
pub struct GlDevice {
	_not_send: PhantomData<*const ()>,
}

impl GlDevice {
	/// Resolve GL entry points through `loader`.
	///
	/// # SAFETY
	/// * the context `loader` belongs to must be current on this thread,
	///   and stay current for the lifetime of the returned device
	pub unsafe fn load_with<F>(loader: F) -> Result<Self, DeviceInitError>
	where
		F: FnMut(&'static str) -> *const c_void,
	{
		gl::load_with(loader);

		let missing = required_entry_points()
			.into_iter()
			.filter(|(_, loaded)| !loaded)
			.map(|(name, _)| name)
			.collect::<Vec<_>>();

		if !missing.is_empty() {
			return Err(DeviceInitError::MissingEntryPoints(missing))
		}

		let version = gl::GetString(gl::VERSION);
		if !version.is_null() {
			log::info!(
				"Driver OpenGL version: {}",
				CStr::from_ptr(version as *const _).to_string_lossy()
			);
		}

		if cfg!(debug_assertions) {
			match super::debug::setup_gl_debug() {
				true => log::info!("GL debug output enabled"),
				false => log::info!("GL debug output unavailable"),
			}
		}

		Ok(Self {
			_not_send: PhantomData,
		})
	}
}

fn required_entry_points() -> [(&'static str, bool); 32] {
	[
		("glGenBuffers", gl::GenBuffers::is_loaded()),
		("glDeleteBuffers", gl::DeleteBuffers::is_loaded()),
		("glBindBuffer", gl::BindBuffer::is_loaded()),
		("glBufferData", gl::BufferData::is_loaded()),
		("glCreateShader", gl::CreateShader::is_loaded()),
		("glShaderSource", gl::ShaderSource::is_loaded()),
		("glCompileShader", gl::CompileShader::is_loaded()),
		("glGetShaderiv", gl::GetShaderiv::is_loaded()),
		("glGetShaderInfoLog", gl::GetShaderInfoLog::is_loaded()),
		("glDeleteShader", gl::DeleteShader::is_loaded()),
		("glCreateProgram", gl::CreateProgram::is_loaded()),
		("glAttachShader", gl::AttachShader::is_loaded()),
		("glDetachShader", gl::DetachShader::is_loaded()),
		("glLinkProgram", gl::LinkProgram::is_loaded()),
		("glGetProgramiv", gl::GetProgramiv::is_loaded()),
		("glGetProgramInfoLog", gl::GetProgramInfoLog::is_loaded()),
		("glUseProgram", gl::UseProgram::is_loaded()),
		("glDeleteProgram", gl::DeleteProgram::is_loaded()),
		("glGenVertexArrays", gl::GenVertexArrays::is_loaded()),
		("glDeleteVertexArrays", gl::DeleteVertexArrays::is_loaded()),
		("glBindVertexArray", gl::BindVertexArray::is_loaded()),
		("glGetAttribLocation", gl::GetAttribLocation::is_loaded()),
		("glVertexAttribPointer", gl::VertexAttribPointer::is_loaded()),
		("glEnableVertexAttribArray", gl::EnableVertexAttribArray::is_loaded()),
		("glGetUniformLocation", gl::GetUniformLocation::is_loaded()),
		("glUniformMatrix4fv", gl::UniformMatrix4fv::is_loaded()),
		("glDrawElements", gl::DrawElements::is_loaded()),
		("glGetIntegerv", gl::GetIntegerv::is_loaded()),
		("glGetString", gl::GetString::is_loaded()),
		("glViewport", gl::Viewport::is_loaded()),
		("glClearColor", gl::ClearColor::is_loaded()),
		("glClear", gl::Clear::is_loaded()),
	]
}

/// Names containing a NUL byte can never match an active input.
fn gl_name(name: &str) -> Option<CString> {
	CString::new(name).ok()
}

pub(super) unsafe fn get_integer(parameter: GLenum) -> GLint {
	let mut value = 0;
	gl::GetIntegerv(parameter, &mut value);
	value
}

/// Read an info log of `log_length` bytes (null terminator included).
unsafe fn read_info_log(
	log_length: GLint,
	read: impl FnOnce(GLsizei, *mut GLsizei, *mut GLchar),
) -> String {
	if log_length <= 0 {
		return String::new()
	}

	let mut log = vec![0u8; log_length as usize];
	let mut written = 0 as GLsizei;
	read(log_length, &mut written, log.as_mut_ptr() as *mut GLchar);
	log.truncate(written.max(0) as usize);

	// drivers are expected to hand out ASCII, but don't trust them
	String::from_utf8_lossy(&log).into_owned()
}

impl Device for GlDevice {
	fn gen_buffer(&self) -> GLuint {
		let mut buffer = 0;
		unsafe { gl::GenBuffers(1, &mut buffer) };
		buffer
	}

	fn delete_buffer(&self, buffer: GLuint) {
		unsafe { gl::DeleteBuffers(1, &buffer) };
	}

	fn bind_buffer(&self, target: GLenum, buffer: GLuint) {
		unsafe { gl::BindBuffer(target, buffer) };
	}

	fn buffer_data(&self, target: GLenum, data: &[u8], usage: GLenum) {
		unsafe {
			gl::BufferData(
				target,
				data.len() as GLsizeiptr,
				data.as_ptr() as *const c_void,
				usage,
			)
		};
	}

	fn create_shader(&self, ty: GLenum) -> GLuint {
		unsafe { gl::CreateShader(ty) }
	}

	fn shader_source(&self, shader: GLuint, source: &str) {
		let src_ptr = source.as_bytes().as_ptr() as *const GLchar;
		let len = source.len() as GLint;
		unsafe { gl::ShaderSource(shader, 1, &src_ptr, &len) };
	}

	fn compile_shader(&self, shader: GLuint) {
		unsafe { gl::CompileShader(shader) };
	}

	fn shader_compile_status(&self, shader: GLuint) -> bool {
		let mut compile_status = 0 as GLint;
		unsafe { gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut compile_status) };
		compile_status == gl::TRUE as GLint
	}

	fn shader_info_log(&self, shader: GLuint) -> String {
		unsafe {
			let mut log_length = 0 as GLint;
			gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut log_length);
			read_info_log(log_length, |len, written, log| {
				gl::GetShaderInfoLog(shader, len, written, log)
			})
		}
	}

	fn delete_shader(&self, shader: GLuint) {
		// The driver only deletes the backing shader object
		// once it is no longer attached to a program.
		unsafe { gl::DeleteShader(shader) };
	}

	fn create_program(&self) -> GLuint {
		unsafe { gl::CreateProgram() }
	}

	fn attach_shader(&self, program: GLuint, shader: GLuint) {
		unsafe { gl::AttachShader(program, shader) };
	}

	fn detach_shader(&self, program: GLuint, shader: GLuint) {
		unsafe { gl::DetachShader(program, shader) };
	}

	fn link_program(&self, program: GLuint) {
		unsafe { gl::LinkProgram(program) };
	}

	fn program_link_status(&self, program: GLuint) -> bool {
		let mut link_status = 0 as GLint;
		unsafe { gl::GetProgramiv(program, gl::LINK_STATUS, &mut link_status) };
		link_status == gl::TRUE as GLint
	}

	fn program_info_log(&self, program: GLuint) -> String {
		unsafe {
			let mut log_length = 0 as GLint;
			gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut log_length);
			read_info_log(log_length, |len, written, log| {
				gl::GetProgramInfoLog(program, len, written, log)
			})
		}
	}

	fn use_program(&self, program: GLuint) {
		unsafe { gl::UseProgram(program) };
	}

	fn delete_program(&self, program: GLuint) {
		unsafe { gl::DeleteProgram(program) };
	}

	fn current_program(&self) -> GLuint {
		unsafe { get_integer(gl::CURRENT_PROGRAM) as GLuint }
	}

	fn gen_vertex_array(&self) -> GLuint {
		let mut vertex_array = 0;
		unsafe { gl::GenVertexArrays(1, &mut vertex_array) };
		vertex_array
	}

	fn delete_vertex_array(&self, vertex_array: GLuint) {
		unsafe { gl::DeleteVertexArrays(1, &vertex_array) };
	}

	fn bind_vertex_array(&self, vertex_array: GLuint) {
		unsafe { gl::BindVertexArray(vertex_array) };
	}

	fn vertex_array_binding(&self) -> GLuint {
		unsafe { get_integer(gl::VERTEX_ARRAY_BINDING) as GLuint }
	}

	fn attrib_location(&self, program: GLuint, name: &str) -> GLint {
		match gl_name(name) {
			Some(name) => unsafe { gl::GetAttribLocation(program, name.as_ptr()) },
			None => -1,
		}
	}

	fn vertex_attrib_pointer(
		&self,
		location: GLuint,
		components: GLint,
		ty: GLenum,
		normalized: bool,
		stride: GLsizei,
		offset: usize,
	) {
		unsafe {
			gl::VertexAttribPointer(
				location,
				components,
				ty,
				match normalized {
					true => gl::TRUE,
					false => gl::FALSE,
				},
				stride,
				offset as *const c_void,
			)
		};
	}

	fn enable_vertex_attrib_array(&self, location: GLuint) {
		unsafe { gl::EnableVertexAttribArray(location) };
	}

	fn uniform_location(&self, program: GLuint, name: &str) -> GLint {
		match gl_name(name) {
			Some(name) => unsafe { gl::GetUniformLocation(program, name.as_ptr()) },
			None => -1,
		}
	}

	fn uniform_matrix4(&self, location: GLint, value: &[f32; 16]) {
		unsafe { gl::UniformMatrix4fv(location, 1, gl::FALSE, value.as_ptr()) };
	}

	fn draw_elements(&self, mode: GLenum, count: GLsizei, ty: GLenum, offset: usize) {
		unsafe { gl::DrawElements(mode, count, ty, offset as *const c_void) };
	}

	fn viewport(&self, x: GLint, y: GLint, width: GLsizei, height: GLsizei) {
		unsafe { gl::Viewport(x, y, width, height) };
	}

	fn clear_color(&self, [r, g, b, a]: [f32; 4]) {
		unsafe { gl::ClearColor(r, g, b, a) };
	}

	fn clear(&self, mask: GLenum) {
		unsafe { gl::Clear(mask) };
	}
}
