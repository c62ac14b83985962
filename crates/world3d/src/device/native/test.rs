use super::{DeviceInitError, GlDevice};

#[test]
fn unresolved_loader_lists_every_missing_entry_point() {
	// nothing resolves, so no GL function is called and no context is needed
	let result = unsafe { GlDevice::load_with(|_| std::ptr::null()) };

	match result {
		Err(DeviceInitError::MissingEntryPoints(missing)) => {
			assert_eq!(missing.len(), 32);
			assert_eq!(&missing[..3], ["glGenBuffers", "glDeleteBuffers", "glBindBuffer"]);
			assert!(missing.contains(&"glDrawElements"));

			let message = DeviceInitError::MissingEntryPoints(missing).to_string();
			assert!(message.starts_with("could not resolve OpenGL entry points: glGenBuffers, "));
		},
		Ok(_) => panic!("device loaded without any entry points"),
	}
}
