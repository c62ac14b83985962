// Copyright (C) 2022 the ITK authors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/./

use std::ffi::{c_char, c_void, CStr};

use gl::types::{GLenum, GLint, GLsizei, GLuint};
use log::Level;

use super::native::get_integer;

/// Route driver debug messages into `log`.
///
/// Returns false if the context supports neither OpenGL 4.3 nor one of the
/// `KHR_debug` / `ARB_debug_output` extensions.
///
/// # SAFETY
/// * a GL context must be current on this thread
pub unsafe fn setup_gl_debug() -> bool {
	// some loaders resolve any name, this only guards the calls below
	let loaded = [
		gl::Enable::is_loaded(),
		gl::GetIntegerv::is_loaded(),
		gl::GetStringi::is_loaded(),
		gl::DebugMessageCallback::is_loaded(),
		gl::DebugMessageControl::is_loaded(),
	];
	if loaded.contains(&false) {
		return false
	}

	let version = (get_integer(gl::MAJOR_VERSION), get_integer(gl::MINOR_VERSION));
	let extension_count = get_integer(gl::NUM_EXTENSIONS).max(0) as GLuint;
	let extensions = (0..extension_count)
		.filter_map(|i| {
			let name = gl::GetStringi(gl::EXTENSIONS, i);
			(!name.is_null())
				.then(|| CStr::from_ptr(name as *const c_char).to_string_lossy().into_owned())
		})
		.collect::<Vec<_>>();

	if !debug_output_supported(version, extensions.iter().map(String::as_str)) {
		return false
	}

	if get_integer(gl::CONTEXT_FLAGS) as GLenum & gl::CONTEXT_FLAG_DEBUG_BIT == 0 {
		log::debug!("not a debug context, the driver may report little");
	}

	gl::Enable(gl::DEBUG_OUTPUT);
	gl::Enable(gl::DEBUG_OUTPUT_SYNCHRONOUS);
	gl::DebugMessageCallback(Some(gl_debug), std::ptr::null());
	// everything, filtering happens in the log backend
	gl::DebugMessageControl(gl::DONT_CARE, gl::DONT_CARE, gl::DONT_CARE, 0, std::ptr::null(), gl::TRUE);

	true
}

extern "system" fn gl_debug(
	source: GLenum,
	ty: GLenum,
	id: GLuint,
	severity: GLenum,
	_length: GLsizei,
	message: *const c_char,
	_user_param: *mut c_void,
) {
	if message.is_null() {
		return
	}

	// null terminated and valid for the duration of the callback
	let message = unsafe { CStr::from_ptr(message) }.to_string_lossy();

	log::log!(
		target: "OpenGL",
		severity_level(severity),
		"{} {} ({id}): {message}",
		source_name(source),
		type_name(ty),
	);
}

fn debug_output_supported<'a>(
	version: (GLint, GLint),
	mut extensions: impl Iterator<Item = &'a str>,
) -> bool {
	version >= (4, 3) || extensions.any(|e| matches!(e, "GL_KHR_debug" | "GL_ARB_debug_output"))
}

// unknown values fall through instead of panicking, unwinding into the driver aborts

fn severity_level(severity: GLenum) -> Level {
	match severity {
		gl::DEBUG_SEVERITY_HIGH => Level::Error,
		gl::DEBUG_SEVERITY_MEDIUM => Level::Warn,
		gl::DEBUG_SEVERITY_LOW => Level::Debug,
		_ => Level::Trace,
	}
}

fn source_name(source: GLenum) -> &'static str {
	match source {
		gl::DEBUG_SOURCE_API => "api",
		gl::DEBUG_SOURCE_WINDOW_SYSTEM => "window-system",
		gl::DEBUG_SOURCE_SHADER_COMPILER => "shader-compiler",
		gl::DEBUG_SOURCE_THIRD_PARTY => "third-party",
		gl::DEBUG_SOURCE_APPLICATION => "application",
		_ => "other",
	}
}

fn type_name(ty: GLenum) -> &'static str {
	match ty {
		gl::DEBUG_TYPE_ERROR => "error",
		gl::DEBUG_TYPE_DEPRECATED_BEHAVIOR => "deprecated",
		gl::DEBUG_TYPE_UNDEFINED_BEHAVIOR => "undefined-behavior",
		gl::DEBUG_TYPE_PORTABILITY => "portability",
		gl::DEBUG_TYPE_PERFORMANCE => "performance",
		gl::DEBUG_TYPE_MARKER => "marker",
		gl::DEBUG_TYPE_PUSH_GROUP => "push-group",
		gl::DEBUG_TYPE_POP_GROUP => "pop-group",
		_ => "other",
	}
}
