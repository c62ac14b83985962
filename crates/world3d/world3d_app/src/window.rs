// Copyright (C) 2022 the ITK authors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/./

use std::{ffi::c_void, sync::mpsc::Receiver};

use glfw::{Action, Context, Key, Modifiers, OpenGlProfileHint, WindowEvent, WindowHint};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WindowError {
	#[error("could not initialize GLFW: {0}")]
	Init(#[from] glfw::InitError),
	#[error("could not create a {width}x{height} window with an OpenGL {}.{} context", .gl_version.0, .gl_version.1)]
	CreateWindow {
		width: u32,
		height: u32,
		gl_version: (u32, u32),
	},
}

#[derive(Debug, Clone)]
pub struct WindowConfig {
	pub width: u32,
	pub height: u32,
	pub title: String,
	/// Requested core profile version as (major, minor).
	pub gl_version: (u32, u32),
}

impl Default for WindowConfig {
	fn default() -> Self {
		Self {
			width: 400,
			height: 400,
			title: "World 3D".to_owned(),
			gl_version: (3, 3),
		}
	}
}

/// What the main loop should do, collected from input since the last frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WindowActions {
	pub close: bool,
	pub reset_size: bool,
	pub toggle_pause: bool,
	pub resized: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
	Close,
	ResetSize,
	TogglePause,
}

/// Map a key event to the command bound to it.
///
/// Every binding fires when its key is released.
pub fn key_command(key: Key, action: Action, mods: Modifiers) -> Option<KeyCommand> {
	if action != Action::Release {
		return None
	}

	let ctrl = mods == Modifiers::Control;
	let alt = mods == Modifiers::Alt;

	match key {
		Key::Q | Key::W if ctrl => Some(KeyCommand::Close),
		Key::F4 if alt => Some(KeyCommand::Close),
		Key::R if ctrl => Some(KeyCommand::ResetSize),
		Key::Space if mods.is_empty() => Some(KeyCommand::TogglePause),
		_ => None,
	}
}

/// One GLFW window with a current OpenGL context.
pub struct WindowHandler {
	glfw: glfw::Glfw,
	window: glfw::Window,
	events: Receiver<(f64, WindowEvent)>,
	config: WindowConfig,
	framebuffer_size: (i32, i32),
	actions: WindowActions,
}

impl WindowHandler {
	/// Open the window and make its context current on this thread.
	pub fn new(config: WindowConfig) -> Result<Self, WindowError> {
		let mut glfw = glfw::init(glfw::LOG_ERRORS)?;

		let (major, minor) = config.gl_version;
		glfw.window_hint(WindowHint::ContextVersion(major, minor));
		glfw.window_hint(WindowHint::OpenGlProfile(OpenGlProfileHint::Core));
		glfw.window_hint(WindowHint::OpenGlForwardCompat(cfg!(target_os = "macos")));
		glfw.window_hint(WindowHint::OpenGlDebugContext(cfg!(debug_assertions)));
		glfw.window_hint(WindowHint::Decorated(true));

		let (mut window, events) = glfw
			.create_window(config.width, config.height, &config.title, glfw::WindowMode::Windowed)
			.ok_or(WindowError::CreateWindow {
				width: config.width,
				height: config.height,
				gl_version: config.gl_version,
			})?;

		window.make_current();
		window.set_key_polling(true);

		let framebuffer_size = window.get_framebuffer_size();
		log::info!(
			"opened {}x{} window `{}` (framebuffer {}x{})",
			config.width,
			config.height,
			config.title,
			framebuffer_size.0,
			framebuffer_size.1
		);

		Ok(Self {
			glfw,
			window,
			events,
			config,
			framebuffer_size,
			actions: WindowActions {
				resized: true,
				..Default::default()
			},
		})
	}

	/// Address of an OpenGL entry point in the window's context.
	pub fn get_proc_address(&mut self, name: &str) -> *const c_void {
		self.window.get_proc_address(name)
	}

	pub fn is_open(&self) -> bool {
		!self.window.should_close()
	}

	pub fn close(&mut self) {
		self.window.set_should_close(true);
	}

	/// Restore the configured window size.
	pub fn reset_size(&mut self) {
		self.window.set_size(self.config.width as i32, self.config.height as i32);
		self.actions.resized = true;
	}

	#[inline]
	pub fn framebuffer_size(&self) -> (i32, i32) {
		self.framebuffer_size
	}

	/// Actions collected since the last call.
	pub fn take_actions(&mut self) -> WindowActions {
		std::mem::take(&mut self.actions)
	}

	/// Pick up framebuffer size changes before drawing.
	pub fn pre_render(&mut self) {
		let size = self.window.get_framebuffer_size();
		if size != self.framebuffer_size {
			log::debug!("framebuffer resized to {}x{}", size.0, size.1);
			self.framebuffer_size = size;
			self.actions.resized = true;
		}
	}

	/// Present the frame and handle pending input.
	pub fn post_render(&mut self) {
		self.window.swap_buffers();
		self.glfw.poll_events();

		for (_, event) in glfw::flush_messages(&self.events) {
			let WindowEvent::Key(key, _, action, mods) = event else { continue };

			match key_command(key, action, mods) {
				Some(KeyCommand::Close) => self.actions.close = true,
				Some(KeyCommand::ResetSize) => {
					self.actions.reset_size = true;
					self.actions.resized = true;
				},
				Some(KeyCommand::TogglePause) => self.actions.toggle_pause = true,
				None => {},
			}
		}
	}
}
