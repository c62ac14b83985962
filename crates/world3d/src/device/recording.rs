// Copyright (C) 2022 the ITK authors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/./

//! In-memory [`Device`] for tests.
//!
//! Tracks live objects and bindings the way a GL driver would, and keeps a log
//! of the calls that produce output. Compiling succeeds when the source has a
//! `void main`, linking succeeds when every attached shader compiled. Active
//! attributes are the vertex stage's `in` declarations, active uniforms the
//! `uniform` declarations of any stage, both numbered in declaration order.

use std::{
	cell::RefCell,
	collections::{HashMap, HashSet},
	rc::Rc,
};

use gl::types::{GLenum, GLint, GLsizei, GLuint};

use super::{Device, SharedDevice};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
	BufferData {
		target: GLenum,
		buffer: GLuint,
		data: Vec<u8>,
		usage: GLenum,
	},
	VertexAttribPointer {
		location: GLuint,
		array_buffer: GLuint,
		components: GLint,
		ty: GLenum,
		normalized: bool,
		stride: GLsizei,
		offset: usize,
	},
	EnableVertexAttribArray(GLuint),
	UniformMatrix4 {
		program: GLuint,
		location: GLint,
		value: [f32; 16],
	},
	DrawElements {
		vertex_array: GLuint,
		element_buffer: GLuint,
		mode: GLenum,
		count: GLsizei,
		ty: GLenum,
	},
	Viewport(GLint, GLint, GLsizei, GLsizei),
	ClearColor([f32; 4]),
	Clear(GLenum),
}

struct FakeShader {
	ty: GLenum,
	source: String,
	compiled: bool,
}

#[derive(Default)]
struct FakeProgram {
	attached: Vec<GLuint>,
	linked: bool,
	log: String,
	attributes: Vec<String>,
	uniforms: Vec<String>,
}

#[derive(Default)]
struct State {
	next_name: GLuint,
	buffers: HashSet<GLuint>,
	shaders: HashMap<GLuint, FakeShader>,
	programs: HashMap<GLuint, FakeProgram>,
	vertex_arrays: HashSet<GLuint>,
	array_buffer: GLuint,
	// element buffer bindings are vertex array state, keyed by vertex array (0 = none bound)
	element_buffers: HashMap<GLuint, GLuint>,
	vertex_array: GLuint,
	program: GLuint,
	bad_deletes: usize,
	calls: Vec<Call>,
}

#[derive(Default)]
pub struct RecordingDevice {
	state: RefCell<State>,
}

impl RecordingDevice {
	pub fn new() -> Rc<Self> {
		Rc::new(Self::default())
	}

	pub fn shared(self: &Rc<Self>) -> SharedDevice {
		self.clone()
	}

	pub fn live_buffers(&self) -> usize {
		self.state.borrow().buffers.len()
	}

	pub fn live_shaders(&self) -> usize {
		self.state.borrow().shaders.len()
	}

	pub fn live_programs(&self) -> usize {
		self.state.borrow().programs.len()
	}

	pub fn live_vertex_arrays(&self) -> usize {
		self.state.borrow().vertex_arrays.len()
	}

	/// Deletes of names that were never created or already deleted.
	pub fn bad_deletes(&self) -> usize {
		self.state.borrow().bad_deletes
	}

	pub fn bound_buffer(&self, target: GLenum) -> GLuint {
		let state = self.state.borrow();
		match target {
			gl::ELEMENT_ARRAY_BUFFER =>
				state.element_buffers.get(&state.vertex_array).copied().unwrap_or(0),
			_ => state.array_buffer,
		}
	}

	/// Element buffer recorded in a vertex array's state.
	pub fn element_buffer_of(&self, vertex_array: GLuint) -> GLuint {
		self.state.borrow().element_buffers.get(&vertex_array).copied().unwrap_or(0)
	}

	pub fn calls(&self) -> Vec<Call> {
		self.state.borrow().calls.clone()
	}

	pub fn draw_calls(&self) -> Vec<Call> {
		self.calls().into_iter().filter(|c| matches!(c, Call::DrawElements { .. })).collect()
	}

	fn record(&self, call: Call) {
		self.state.borrow_mut().calls.push(call);
	}
}

impl State {
	fn name(&mut self) -> GLuint {
		self.next_name += 1;
		self.next_name
	}

	fn delete(removed: bool, bad_deletes: &mut usize) {
		if !removed {
			*bad_deletes += 1;
		}
	}
}

/// Names declared by lines starting with `keyword`, ignoring any `layout(...)` qualifier.
fn declarations(source: &str, keyword: &str) -> Vec<String> {
	let mut names = Vec::new();
	for line in source.lines() {
		let mut line = line.trim();
		if let Some(rest) = line.strip_prefix("layout") {
			line = rest.split_once(')').map(|(_, rest)| rest.trim()).unwrap_or(rest);
		}

		let Some(rest) = line.strip_prefix(keyword) else { continue };
		if !rest.starts_with(char::is_whitespace) {
			continue
		}
		let Some((declaration, _)) = rest.split_once(';') else { continue };

		// `type a, b` declares both a and b
		let mut parts = declaration.trim().splitn(2, char::is_whitespace);
		let _ty = parts.next();
		if let Some(list) = parts.next() {
			names.extend(list.split(',').map(|n| n.trim().to_owned()).filter(|n| !n.is_empty()));
		}
	}
	names
}

impl Device for RecordingDevice {
	fn gen_buffer(&self) -> GLuint {
		let mut state = self.state.borrow_mut();
		let name = state.name();
		state.buffers.insert(name);
		name
	}

	fn delete_buffer(&self, buffer: GLuint) {
		let state = &mut *self.state.borrow_mut();
		State::delete(state.buffers.remove(&buffer), &mut state.bad_deletes);
		if state.array_buffer == buffer {
			state.array_buffer = 0;
		}
	}

	fn bind_buffer(&self, target: GLenum, buffer: GLuint) {
		let mut state = self.state.borrow_mut();
		assert!(buffer == 0 || state.buffers.contains(&buffer), "bind of unknown buffer {buffer}");
		match target {
			gl::ELEMENT_ARRAY_BUFFER => {
				let vertex_array = state.vertex_array;
				state.element_buffers.insert(vertex_array, buffer);
			},
			_ => state.array_buffer = buffer,
		}
	}

	fn buffer_data(&self, target: GLenum, data: &[u8], usage: GLenum) {
		let buffer = self.bound_buffer(target);
		assert_ne!(buffer, 0, "buffer_data with no buffer bound");
		self.record(Call::BufferData {
			target,
			buffer,
			data: data.to_vec(),
			usage,
		});
	}

	fn create_shader(&self, ty: GLenum) -> GLuint {
		let mut state = self.state.borrow_mut();
		let name = state.name();
		state.shaders.insert(name, FakeShader {
			ty,
			source: String::new(),
			compiled: false,
		});
		name
	}

	fn shader_source(&self, shader: GLuint, source: &str) {
		if let Some(s) = self.state.borrow_mut().shaders.get_mut(&shader) {
			s.source = source.to_owned();
		}
	}

	fn compile_shader(&self, shader: GLuint) {
		if let Some(s) = self.state.borrow_mut().shaders.get_mut(&shader) {
			s.compiled = s.source.contains("void main");
		}
	}

	fn shader_compile_status(&self, shader: GLuint) -> bool {
		self.state.borrow().shaders.get(&shader).map(|s| s.compiled).unwrap_or(false)
	}

	fn shader_info_log(&self, shader: GLuint) -> String {
		match self.shader_compile_status(shader) {
			true => String::new(),
			false => "0:1(1): error: function `main' is undefined".to_owned(),
		}
	}

	fn delete_shader(&self, shader: GLuint) {
		let state = &mut *self.state.borrow_mut();
		State::delete(state.shaders.remove(&shader).is_some(), &mut state.bad_deletes);
	}

	fn create_program(&self) -> GLuint {
		let mut state = self.state.borrow_mut();
		let name = state.name();
		state.programs.insert(name, FakeProgram::default());
		name
	}

	fn attach_shader(&self, program: GLuint, shader: GLuint) {
		if let Some(p) = self.state.borrow_mut().programs.get_mut(&program) {
			p.attached.push(shader);
		}
	}

	fn detach_shader(&self, program: GLuint, shader: GLuint) {
		if let Some(p) = self.state.borrow_mut().programs.get_mut(&program) {
			p.attached.retain(|s| *s != shader);
		}
	}

	fn link_program(&self, program: GLuint) {
		let state = &mut *self.state.borrow_mut();
		let Some(p) = state.programs.get_mut(&program) else { return };
		let shaders = p.attached.iter().filter_map(|s| state.shaders.get(s)).collect::<Vec<_>>();

		p.linked = !shaders.is_empty() && shaders.iter().all(|s| s.compiled);
		p.log = match p.linked {
			true => String::new(),
			false => "error: linking with uncompiled/unspecialized shader".to_owned(),
		};
		p.attributes = shaders
			.iter()
			.filter(|s| s.ty == gl::VERTEX_SHADER)
			.flat_map(|s| declarations(&s.source, "in"))
			.collect();
		p.uniforms.clear();
		for uniform in shaders.iter().flat_map(|s| declarations(&s.source, "uniform")) {
			if !p.uniforms.contains(&uniform) {
				p.uniforms.push(uniform);
			}
		}
	}

	fn program_link_status(&self, program: GLuint) -> bool {
		self.state.borrow().programs.get(&program).map(|p| p.linked).unwrap_or(false)
	}

	fn program_info_log(&self, program: GLuint) -> String {
		self.state.borrow().programs.get(&program).map(|p| p.log.clone()).unwrap_or_default()
	}

	fn use_program(&self, program: GLuint) {
		self.state.borrow_mut().program = program;
	}

	fn delete_program(&self, program: GLuint) {
		let state = &mut *self.state.borrow_mut();
		State::delete(state.programs.remove(&program).is_some(), &mut state.bad_deletes);
		if state.program == program {
			state.program = 0;
		}
	}

	fn current_program(&self) -> GLuint {
		self.state.borrow().program
	}

	fn gen_vertex_array(&self) -> GLuint {
		let mut state = self.state.borrow_mut();
		let name = state.name();
		state.vertex_arrays.insert(name);
		name
	}

	fn delete_vertex_array(&self, vertex_array: GLuint) {
		let state = &mut *self.state.borrow_mut();
		State::delete(state.vertex_arrays.remove(&vertex_array), &mut state.bad_deletes);
		state.element_buffers.remove(&vertex_array);
		if state.vertex_array == vertex_array {
			state.vertex_array = 0;
		}
	}

	fn bind_vertex_array(&self, vertex_array: GLuint) {
		let mut state = self.state.borrow_mut();
		assert!(
			vertex_array == 0 || state.vertex_arrays.contains(&vertex_array),
			"bind of unknown vertex array {vertex_array}"
		);
		state.vertex_array = vertex_array;
	}

	fn vertex_array_binding(&self) -> GLuint {
		self.state.borrow().vertex_array
	}

	fn attrib_location(&self, program: GLuint, name: &str) -> GLint {
		let state = self.state.borrow();
		state
			.programs
			.get(&program)
			.filter(|p| p.linked)
			.and_then(|p| p.attributes.iter().position(|a| a == name))
			.map(|i| i as GLint)
			.unwrap_or(-1)
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
		let array_buffer = self.state.borrow().array_buffer;
		self.record(Call::VertexAttribPointer {
			location,
			array_buffer,
			components,
			ty,
			normalized,
			stride,
			offset,
		});
	}

	fn enable_vertex_attrib_array(&self, location: GLuint) {
		self.record(Call::EnableVertexAttribArray(location));
	}

	fn uniform_location(&self, program: GLuint, name: &str) -> GLint {
		let state = self.state.borrow();
		state
			.programs
			.get(&program)
			.filter(|p| p.linked)
			.and_then(|p| p.uniforms.iter().position(|u| u == name))
			.map(|i| i as GLint)
			.unwrap_or(-1)
	}

	fn uniform_matrix4(&self, location: GLint, value: &[f32; 16]) {
		let program = self.state.borrow().program;
		self.record(Call::UniformMatrix4 {
			program,
			location,
			value: *value,
		});
	}

	fn draw_elements(&self, mode: GLenum, count: GLsizei, ty: GLenum, _offset: usize) {
		let (vertex_array, element_buffer) = {
			let state = self.state.borrow();
			let vertex_array = state.vertex_array;
			(vertex_array, state.element_buffers.get(&vertex_array).copied().unwrap_or(0))
		};
		self.record(Call::DrawElements {
			vertex_array,
			element_buffer,
			mode,
			count,
			ty,
		});
	}

	fn viewport(&self, x: GLint, y: GLint, width: GLsizei, height: GLsizei) {
		self.record(Call::Viewport(x, y, width, height));
	}

	fn clear_color(&self, color: [f32; 4]) {
		self.record(Call::ClearColor(color));
	}

	fn clear(&self, mask: GLenum) {
		self.record(Call::Clear(mask));
	}
}

/// Vertex stage with `position`/`color` inputs and `projection`/`view`/`model` uniforms.
pub const VERTEX_SOURCE: &str = "#version 330 core
layout (location = 0) in vec3 position;
layout (location = 1) in vec3 color;
out vec3 vertex_color;
uniform mat4 projection;
uniform mat4 view;
uniform mat4 model;
void main() {
	gl_Position = projection * view * model * vec4(position, 1.0);
	vertex_color = color;
}
";

pub const FRAGMENT_SOURCE: &str = "#version 330 core
in vec3 vertex_color;
out vec4 frag_color;
void main() {
	frag_color = vec4(vertex_color, 1.0);
}
";
