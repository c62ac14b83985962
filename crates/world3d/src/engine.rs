// Copyright (C) 2022 the ITK authors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/./

use std::{
	fs,
	io,
	path::{Path, PathBuf},
};

use gl::types::{GLint, GLsizei, GLuint};
use glam::Mat4;
use thiserror::Error;

pub use self::config::{EngineConfig, SHADER_DIR_VAR};
use crate::{
	attribute::ShaderAttribute,
	buffer::{Buffer, BufferTarget, BufferUsage},
	camera::Camera,
	device::{DeviceInitError, SharedDevice},
	geometry::{BasicTriangle, Geometry},
	shader::{LinkError, Shader, ShaderError, ShaderProgram, ShaderType},
	uniform::UniformError,
	vertex_array::VertexArrayError,
};

mod config;

/// Anything that stops the engine from being constructed.
#[derive(Debug, Error)]
pub enum EngineError {
	#[error(transparent)]
	DeviceInit(#[from] DeviceInitError),
	#[error("could not read shader source `{}`", path.display())]
	ShaderSource {
		path: PathBuf,
		#[source]
		source: io::Error,
	},
	#[error(transparent)]
	Shader(#[from] ShaderError),
	#[error(transparent)]
	Link(#[from] LinkError),
	#[error(transparent)]
	VertexArray(#[from] VertexArrayError),
	#[error(transparent)]
	Uniform(#[from] UniformError),
}

/// Draws a [`BasicTriangle`] through one shader program.
///
/// Construction is all or nothing: every resource the render loop needs is
/// created up front, so [`Engine::render`] has no failure path.
pub struct Engine {
	device: SharedDevice,
	clear_color: [f32; 4],
	width: GLsizei,
	height: GLsizei,
	// dropped before the buffers its vertex array reads from
	program: ShaderProgram,
	buffers: [Buffer; 3],
	projection: usize,
	view: usize,
	model: usize,
}

impl Engine {
	/// Load both shader stages from the paths in `config` and build the engine.
	pub fn new(device: SharedDevice, config: &EngineConfig) -> Result<Self, EngineError> {
		let vertex_source = read_source(&config.vertex_shader)?;
		let fragment_source = read_source(&config.fragment_shader)?;

		Self::from_sources(device, config, &vertex_source, &fragment_source)
	}

	/// Build the engine from shader sources already in memory.
	///
	/// The shader paths in `config` are ignored.
	pub fn from_sources(
		device: SharedDevice,
		config: &EngineConfig,
		vertex_source: &str,
		fragment_source: &str,
	) -> Result<Self, EngineError> {
		let vertex_shader = Shader::compile(&device, ShaderType::Vertex, vertex_source)?;
		let fragment_shader = Shader::compile(&device, ShaderType::Fragment, fragment_source)?;
		let mut program = ShaderProgram::link(&vertex_shader, &fragment_shader)?;

		let geometry = BasicTriangle;
		let buffers = [
			Buffer::new(
				&device,
				BufferTarget::Array,
				geometry.positions(),
				BufferUsage::StaticDraw,
			),
			Buffer::new(&device, BufferTarget::Array, geometry.colors(), BufferUsage::StaticDraw),
			Buffer::new(
				&device,
				BufferTarget::ElementArray,
				geometry.indices(),
				BufferUsage::StaticDraw,
			),
		];
		let [positions, colors, indices] = &buffers;
		let components = geometry.components() as GLint;

		let vertex_array = program
			.vertex_array_builder()
			.attribute(ShaderAttribute::new::<f32>("position", positions, components))
			.attribute(ShaderAttribute::new::<f32>("color", colors, components))
			.index_buffer(indices)
			.set_index_count(geometry.index_count() as GLsizei)?
			.build()?;
		program.add_vertex_array(vertex_array);

		let projection = program.add_uniform("projection")?;
		let view = program.add_uniform("view")?;
		let model = program.add_uniform("model")?;

		log::info!(
			"render engine ready (program {}, {} vertices)",
			program.id(),
			geometry.vertex_count()
		);

		Ok(Self {
			device,
			clear_color: config.clear_color,
			width: 0,
			height: 0,
			program,
			buffers,
			projection,
			view,
			model,
		})
	}

	/// Set the viewport size used by the next frames.
	pub fn resize(&mut self, width: GLsizei, height: GLsizei) {
		log::debug!("viewport resized to {width}x{height}");
		self.width = width;
		self.height = height;
	}

	/// Draw one frame as seen from `camera`.
	///
	/// Without a camera the frame is skipped and no device call is made.
	pub fn render(&self, camera: Option<&Camera>) {
		let Some(camera) = camera else { return };

		self.device.viewport(0, 0, self.width, self.height);
		self.device.clear_color(self.clear_color);
		self.device.clear(gl::COLOR_BUFFER_BIT);

		self.program.bind();

		let uniforms = self.program.uniforms();
		uniforms[self.projection].set_data(camera.projection());
		uniforms[self.view].set_data(camera.view());

		for vertex_array in self.program.vertex_arrays() {
			vertex_array.bind();
			uniforms[self.model].set_data(&Mat4::IDENTITY);
			vertex_array.draw_triangles();
			vertex_array.unbind();
		}
	}

	#[inline]
	pub fn size(&self) -> (GLsizei, GLsizei) {
		(self.width, self.height)
	}

	#[inline]
	pub fn program(&self) -> &ShaderProgram {
		&self.program
	}

	/// Names of the position, color and index buffers.
	pub fn buffer_ids(&self) -> [GLuint; 3] {
		self.buffers.each_ref().map(Buffer::id)
	}
}

fn read_source(path: &Path) -> Result<String, EngineError> {
	fs::read_to_string(path).map_err(|source| EngineError::ShaderSource {
		path: path.to_path_buf(),
		source,
	})
}
