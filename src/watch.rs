//! Change-driven re-rendering for plan files.
//!
//! A small poll loop in the spirit of `tail -f`: read the plan a few
//! times a second and hand it to a callback whenever the content
//! differs from the last seen version. Ctrl+C flips a process-global
//! flag that ends the loop.

use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(200);

static STOP_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Register the Ctrl+C handler. Call once at startup, before `watch`.
pub fn register_handler() -> Result<(), String> {
    ctrlc::set_handler(|| {
        STOP_REQUESTED.store(true, Ordering::SeqCst);
    })
    .map_err(|e| format!("failed to register Ctrl+C handler: {}", e))
}

/// Check if the watch loop was asked to stop.
pub fn stop_requested() -> bool {
    STOP_REQUESTED.load(Ordering::SeqCst)
}

/// Programmatically stop the watch loop.
///
/// Useful for testing or for ending the loop from other conditions.
pub fn request_stop() {
    STOP_REQUESTED.store(true, Ordering::SeqCst);
}

/// Reset the stop flag. Primarily for testing.
pub fn reset() {
    STOP_REQUESTED.store(false, Ordering::SeqCst);
}

/// Poll `path` until stopped, invoking `on_change` with the file
/// content whenever it changed.
///
/// A missing or momentarily unreadable file is skipped rather than an
/// error; editors that save by rename hit that window regularly. An
/// error from the callback ends the watch.
pub fn watch<F>(path: &str, mut on_change: F) -> Result<(), String>
where
    F: FnMut(&str) -> Result<(), String>,
{
    let mut last_seen: Option<String> = None;
    while !stop_requested() {
        if let Ok(content) = fs::read_to_string(path) {
            if last_seen.as_deref() != Some(content.as_str()) {
                on_change(&content)?;
                last_seen = Some(content);
            }
        }
        thread::sleep(POLL_INTERVAL);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // STOP_REQUESTED is process-global, so these tests serialize.
    static STOP_LOCK: Mutex<()> = Mutex::new(());

    fn locked() -> std::sync::MutexGuard<'static, ()> {
        STOP_LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }

    #[test]
    fn stop_flag_mechanics() {
        let _guard = locked();
        reset();
        assert!(!stop_requested());
        request_stop();
        assert!(stop_requested());
        reset();
        assert!(!stop_requested());
    }

    #[test]
    fn watch_sees_initial_content_and_stops() {
        let _guard = locked();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plan.md");
        fs::write(&path, "hello").unwrap();

        reset();
        let mut seen = Vec::new();
        let result = watch(&path.to_string_lossy(), |content| {
            seen.push(content.to_string());
            request_stop();
            Ok(())
        });
        reset();

        assert!(result.is_ok());
        assert_eq!(seen, vec!["hello".to_string()]);
    }

    #[test]
    fn watch_propagates_callback_errors() {
        let _guard = locked();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plan.md");
        fs::write(&path, "x").unwrap();

        reset();
        let result = watch(&path.to_string_lossy(), |_| Err("boom".to_string()));
        reset();

        assert_eq!(result, Err("boom".to_string()));
    }
}
