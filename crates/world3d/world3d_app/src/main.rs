// Copyright (C) 2022 the ITK authors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/./

use std::{error::Error as _, process::ExitCode, rc::Rc};

use thiserror::Error;
use world3d::{Engine, EngineConfig, EngineError, GlDevice};

use crate::{
	game::Game,
	window::{WindowConfig, WindowError, WindowHandler},
};

mod game;
mod window;

#[derive(Debug, Error)]
enum AppError {
	#[error(transparent)]
	Window(#[from] WindowError),
	#[error(transparent)]
	Engine(#[from] EngineError),
}

fn main() -> ExitCode {
	env_logger::init();

	match run() {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			log::error!("{e}");
			let mut source = e.source();
			while let Some(cause) = source {
				log::error!("  caused by: {cause}");
				source = cause.source();
			}
			ExitCode::FAILURE
		},
	}
}

fn run() -> Result<(), AppError> {
	let mut window = WindowHandler::new(WindowConfig::default())?;

	// SAFETY: `window` made its context current and outlives the engine
	let device = unsafe { GlDevice::load_with(|name| window.get_proc_address(name)) }
		.map_err(EngineError::from)?;

	let mut engine = Engine::new(Rc::new(device), &EngineConfig::from_env())?;

	let (width, height) = window.framebuffer_size();
	let mut game = Game::new(aspect_ratio(width, height));
	let mut paused = false;

	while window.is_open() {
		window.pre_render();

		let actions = window.take_actions();
		if actions.close {
			window.close();
			break
		}
		if actions.reset_size {
			window.reset_size();
		}
		if actions.resized {
			let (width, height) = window.framebuffer_size();
			engine.resize(width, height);
			game.camera_mut().set_aspect_ratio(aspect_ratio(width, height));
		}
		if actions.toggle_pause {
			paused = !paused;
			log::info!("{}", if paused { "paused" } else { "resumed" });
		}

		if !paused {
			game.tick();
		}

		engine.render(Some(game.camera()));

		window.post_render();
	}

	Ok(())
}

fn aspect_ratio(width: i32, height: i32) -> f32 {
	match height {
		0 => 1.0,
		_ => width as f32 / height as f32,
	}
}
