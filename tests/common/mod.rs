use std::path::PathBuf;

// None if the machine has no usable adapter, GPU tests skip themselves in that case.
pub fn gpu() -> Option<(wgpu::Device, wgpu::Queue)> {
    let _ = env_logger::builder().is_test(true).try_init();
    match futures::executor::block_on(cubecapture::wgpu_utils::request_headless_device()) {
        Ok(device_and_queue) => Some(device_and_queue),
        Err(err) => {
            eprintln!("skipping GPU test: {}", err);
            None
        }
    }
}

// Fresh directory per test, removed again by the test on success.
pub fn output_directory(test_name: &str) -> PathBuf {
    let directory = std::env::temp_dir().join(format!("cubecapture-{}-{}", test_name, std::process::id()));
    let _ = std::fs::remove_dir_all(&directory);
    std::fs::create_dir_all(&directory).unwrap();
    directory
}

pub fn to_rgba8(color: [f32; 4]) -> [u8; 4] {
    let mut rgba = [0; 4];
    for (channel, value) in rgba.iter_mut().zip(color.iter()) {
        *channel = (value.clamp(0.0, 1.0) * 255.0).round() as u8;
    }
    rgba
}

// Runs `f` and returns its panic message, None if it didn't panic.
// GPU tests can't use #[should_panic] since they return early without an adapter.
pub fn panic_message<F: FnOnce()>(f: F) -> Option<String> {
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(f)) {
        Ok(()) => None,
        Err(payload) => Some(match payload.downcast::<String>() {
            Ok(message) => *message,
            Err(payload) => match payload.downcast::<&'static str>() {
                Ok(message) => message.to_string(),
                Err(_) => String::from("<non-string panic payload>"),
            },
        }),
    }
}

pub fn assert_panics_with<F: FnOnce()>(f: F, expected: &str) {
    match panic_message(f) {
        Some(message) => assert!(message.contains(expected), "panic message {:?} doesn't contain {:?}", message, expected),
        None => panic!("expected a panic containing {:?}", expected),
    }
}
