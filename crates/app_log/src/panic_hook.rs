//! Panic hook for crash reporting

use backtrace::Backtrace;
use chrono::Local;
use std::any::Any;
use std::panic::PanicHookInfo;
use std::path::PathBuf;

/// Initialize the panic hook for crash reporting
pub fn init_panic_hook() {
    std::panic::set_hook(Box::new(panic_handler));
    tracing::debug!("Panic hook initialized");
}

/// Best-effort text of a panic payload
fn payload_text(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<unknown>"
    }
}

fn crash_report(thread_name: &str, location: &str, payload: &str, backtrace: &str) -> String {
    format!(
        "=== CRITICAL PANIC ===\n\
         Version: {}\n\
         Timestamp: {}\n\
         Thread: {}\n\
         Location: {}\n\
         Payload: {}\n\n\
         Stack Trace:\n{}",
        env!("CARGO_PKG_VERSION"),
        Local::now().to_rfc3339(),
        thread_name,
        location,
        payload,
        backtrace
    )
}

/// Crash dumps go next to the logs, or to the temp dir if that is unavailable
fn dump_path() -> PathBuf {
    let file_name = format!(
        "image_gallery_crash_{}.txt",
        Local::now().format("%Y%m%d_%H%M%S")
    );

    let log_dir = super::log_dir();
    if std::fs::create_dir_all(&log_dir).is_ok() {
        log_dir.join(file_name)
    } else {
        std::env::temp_dir().join(file_name)
    }
}

fn panic_handler(info: &PanicHookInfo) {
    let backtrace = Backtrace::new();
    let thread = std::thread::current();
    let location = info
        .location()
        .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
        .unwrap_or_else(|| "<unknown>".to_string());

    let report = crash_report(
        thread.name().unwrap_or("<unnamed>"),
        &location,
        payload_text(info.payload()),
        &format!("{:?}", backtrace),
    );

    // stderr first: tracing may already be torn down
    eprintln!("{}", report);
    tracing::error!("{}", report);

    let dump_path = dump_path();
    if let Err(e) = std::fs::write(&dump_path, &report) {
        eprintln!("Failed to write crash dump: {}", e);
    }

    #[cfg(windows)]
    show_error_dialog(&dump_path, payload_text(info.payload()));
}

#[cfg(windows)]
fn show_error_dialog(dump_path: &std::path::Path, payload: &str) {
    use windows::core::HSTRING;
    use windows::Win32::UI::WindowsAndMessaging::{MessageBoxW, MB_ICONERROR, MB_OK};

    let msg = format!(
        "An unexpected error occurred.\n\n\
         Crash report: {}\n\n\
         Error: {}",
        dump_path.display(),
        payload
    );

    unsafe {
        MessageBoxW(
            None,
            &HSTRING::from(msg),
            &HSTRING::from("ImageGallery - Fatal Error"),
            MB_ICONERROR | MB_OK,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_text() {
        let s: Box<dyn Any + Send> = Box::new("static message");
        assert_eq!(payload_text(s.as_ref()), "static message");
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned message"));
        assert_eq!(payload_text(owned.as_ref()), "owned message");
        let other: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(payload_text(other.as_ref()), "<unknown>");
    }

    #[test]
    fn test_crash_report_contents() {
        let report = crash_report("main", "src/lib.rs:1:1", "boom", "frames");
        assert!(report.starts_with("=== CRITICAL PANIC ==="));
        assert!(report.contains("Thread: main"));
        assert!(report.contains("Location: src/lib.rs:1:1"));
        assert!(report.contains("Payload: boom"));
        assert!(report.contains("frames"));
    }
}
