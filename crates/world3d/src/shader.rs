// Copyright (C) 2022 the ITK authors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/./

use gl::types::{GLenum, GLuint};
use thiserror::Error;

use crate::{
	device::SharedDevice,
	uniform::{Uniform, UniformError},
	vertex_array::{VertexArray, VertexArrayBuilder},
};


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderType {
	Vertex,
	Fragment,
}

/// One compiled shader stage.
///
/// Compile failure is not an error at this level, see [`Shader::is_compiled`].
pub struct Shader {
	device: SharedDevice,
	ty: ShaderType,
	shader_object: GLuint,
	compiled: bool,
	log: String,
}

/// A linked program, owning the vertex arrays and uniforms created against it.
pub struct ShaderProgram {
	device: SharedDevice,
	program_object: GLuint,
	vertex_arrays: Vec<VertexArray>,
	uniforms: Vec<Uniform>,
}

impl ShaderType {
	#[inline]
	pub fn gl_type(&self) -> GLenum {
		match self {
			Self::Vertex => gl::VERTEX_SHADER,
			Self::Fragment => gl::FRAGMENT_SHADER,
		}
	}
}

#[derive(Debug, Error)]
pub enum ShaderError {
	#[error("could not create shader (glCreateShader returned 0)")]
	CouldNotCreate,
}

#[derive(Debug, Error)]
pub enum LinkError {
	#[error("expected a vertex shader and a fragment shader")]
	InvalidShader,
	#[error("could not create program (glCreateProgram returned 0)")]
	CouldNotCreate,
	#[error("could not link shader program{}", fmt_link_log(.0))]
	Link(Option<String>),
}

fn fmt_link_log(log: &Option<String>) -> String {
	match log {
		Some(log) => format!(" - driver log:\n{log}\n"),
		None => String::new(),
	}
}

impl Shader {
	pub fn compile(
		device: &SharedDevice,
		ty: ShaderType,
		source: &str,
	) -> Result<Self, ShaderError> {
		let shader = device.create_shader(ty.gl_type());
		if shader == 0 {
			return Err(ShaderError::CouldNotCreate)
		}

		device.shader_source(shader, source);
		device.compile_shader(shader);

		let compiled = device.shader_compile_status(shader);
		let log = match compiled {
			true => String::new(),
			false => device.shader_info_log(shader),
		};

		match compiled {
			true => log::debug!("compiled {ty:?} shader {shader}"),
			false => log::debug!("{ty:?} shader {shader} failed to compile:\n{log}"),
		}

		Ok(Shader {
			device: device.clone(),
			ty,
			shader_object: shader,
			compiled,
			log,
		})
	}

	#[inline]
	pub fn ty(&self) -> ShaderType {
		self.ty
	}

	#[inline]
	pub fn id(&self) -> GLuint {
		self.shader_object
	}

	#[inline]
	pub fn is_compiled(&self) -> bool {
		self.compiled
	}

	/// Driver compile log, empty if compilation succeeded.
	pub fn info_log(&self) -> &str {
		&self.log
	}

	#[inline]
	pub fn is_valid(&self) -> bool {
		self.shader_object != 0
	}

	/// Move the shader object out, leaving `self` invalid.
	pub fn take(&mut self) -> Self {
		log::debug!("moved {:?} shader {}", self.ty, self.shader_object);

		Shader {
			device: self.device.clone(),
			ty: self.ty,
			shader_object: std::mem::take(&mut self.shader_object),
			compiled: std::mem::take(&mut self.compiled),
			log: std::mem::take(&mut self.log),
		}
	}

	pub fn release(&mut self) {
		if self.shader_object != 0 {
			log::debug!("deleting {:?} shader {}", self.ty, self.shader_object);
			self.device.delete_shader(std::mem::take(&mut self.shader_object));
		}
	}
}

impl Drop for Shader {
	fn drop(&mut self) {
		self.release();
	}
}

impl ShaderProgram {
	/// Attach both stages, link, and detach them again regardless of the outcome.
	///
	/// A failed program is deleted before returning. The error carries the
	/// driver logs of the program and both stages in checked builds.
	pub fn link(vertex_shader: &Shader, fragment_shader: &Shader) -> Result<Self, LinkError> {
		ensure_valid!(vertex_shader.is_valid(), "shader", Err(LinkError::InvalidShader));
		ensure_valid!(fragment_shader.is_valid(), "shader", Err(LinkError::InvalidShader));

		match (vertex_shader.ty, fragment_shader.ty) {
			(ShaderType::Vertex, ShaderType::Fragment) => {},
			_ => return Err(LinkError::InvalidShader),
		}

		let device = vertex_shader.device.clone();

		let program = device.create_program();
		if program == 0 {
			return Err(LinkError::CouldNotCreate)
		}

		device.attach_shader(program, vertex_shader.shader_object);
		device.attach_shader(program, fragment_shader.shader_object);

		device.link_program(program);

		// allows earlier deletion of shader objects.
		device.detach_shader(program, vertex_shader.shader_object);
		device.detach_shader(program, fragment_shader.shader_object);

		if !device.program_link_status(program) {
			let log = crate::CHECKED.then(|| {
				let mut log = format!("program: {}", device.program_info_log(program));
				for shader in [vertex_shader, fragment_shader] {
					if !shader.log.is_empty() {
						log.push_str(&format!("\n{:?} shader: {}", shader.ty, shader.log));
					}
				}
				log
			});

			device.delete_program(program);
			log::debug!("program {program} failed to link");

			return Err(LinkError::Link(log))
		}

		log::debug!("linked program {program}");

		Ok(ShaderProgram {
			device,
			program_object: program,
			vertex_arrays: Vec::new(),
			uniforms: Vec::new(),
		})
	}

	/// Make this the active program.
	pub fn bind(&self) {
		ensure_valid!(self.is_valid(), "shader program");
		self.device.use_program(self.program_object);
	}

	#[inline]
	pub fn id(&self) -> GLuint {
		self.program_object
	}

	#[inline]
	pub fn is_valid(&self) -> bool {
		self.program_object != 0
	}

	#[inline]
	pub(crate) fn device(&self) -> &SharedDevice {
		&self.device
	}

	/// Start assembling a vertex array whose inputs are looked up in this program.
	pub fn vertex_array_builder(&self) -> VertexArrayBuilder<'_> {
		VertexArrayBuilder::new(self)
	}

	pub fn add_vertex_array(&mut self, vertex_array: VertexArray) {
		self.vertex_arrays.push(vertex_array);
	}

	pub fn vertex_arrays(&self) -> &[VertexArray] {
		&self.vertex_arrays
	}

	/// Resolve the uniform `name` and keep it, returning its index in [`Self::uniforms`].
	pub fn add_uniform(&mut self, name: &str) -> Result<usize, UniformError> {
		let uniform = Uniform::new(self, name)?;
		self.uniforms.push(uniform);
		Ok(self.uniforms.len() - 1)
	}

	pub fn uniform(&self, name: &str) -> Option<&Uniform> {
		self.uniforms.iter().find(|u| u.name() == name)
	}

	pub fn uniforms(&self) -> &[Uniform] {
		&self.uniforms
	}

	/// Move the program, its vertex arrays and uniforms out, leaving `self` invalid.
	pub fn take(&mut self) -> Self {
		log::debug!("moved program {}", self.program_object);

		ShaderProgram {
			device: self.device.clone(),
			program_object: std::mem::take(&mut self.program_object),
			vertex_arrays: std::mem::take(&mut self.vertex_arrays),
			uniforms: std::mem::take(&mut self.uniforms),
		}
	}

	/// Delete the program and everything created against it.
	pub fn release(&mut self) {
		self.vertex_arrays.clear();
		self.uniforms.clear();

		if self.program_object != 0 {
			log::debug!("deleting program {}", self.program_object);
			self.device.delete_program(std::mem::take(&mut self.program_object));
		}
	}
}

impl Drop for ShaderProgram {
	fn drop(&mut self) {
		self.release();
	}
}
