// Bridge boundary guard: catches panics before they unwind across the C
// ABI (which is undefined behavior).

/// Execute `f` and catch any panic, returning `default` on failure.
///
/// Every `extern "C"` export wraps its body in this guard. The panic
/// message is forwarded to the engine log when a plugin instance is
/// reachable; otherwise the panic is swallowed, which is still better
/// than unwinding into the host.
pub fn bridge_boundary<F, R>(default: R, f: F) -> R
where
    F: FnOnce() -> R + std::panic::UnwindSafe,
{
    match std::panic::catch_unwind(f) {
        Ok(value) => value,
        Err(payload) => {
            crate::exports::log_panic(&panic_message(&payload));
            default
        }
    }
}

/// Extract a human-readable message from a panic payload.
fn panic_message(payload: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("[Spyglass] panic: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("[Spyglass] panic: {s}")
    } else {
        "[Spyglass] panic (unknown payload)".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_value_on_success() {
        assert_eq!(bridge_boundary(0i32, || 42), 42);
    }

    #[test]
    fn returns_default_on_panic() {
        let result = bridge_boundary(-1i32, || {
            panic!("test panic");
        });
        assert_eq!(result, -1);
    }

    #[test]
    fn returns_default_on_string_panic() {
        let result = bridge_boundary(false, || -> bool {
            panic!("{}", "formatted panic");
        });
        assert!(!result);
    }
}
