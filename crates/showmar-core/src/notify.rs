/// Non-blocking user notifications (toasts in a browser, status lines in a terminal).
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);

    /// Cosmetic flourish after a successful submission.
    fn celebrate(&self) {}
}

/// Blocking yes/no prompt.
pub trait Confirmation {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirmation for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}
