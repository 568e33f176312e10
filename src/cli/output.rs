//! Console styling for user-facing messages.
//!
//! Progress and results go to stdout; `run()` prints `CliError` messages to stderr.

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

fn paint(color: &str, msg: &str) -> String {
    format!("{color}{msg}{RESET}")
}

/// Progress and completion messages.
pub fn progress(msg: &str) {
    println!("{}", paint(GREEN, msg));
}

/// Weapp output and non-fatal advisories.
pub fn highlight(msg: &str) {
    println!("{}", paint(YELLOW, msg));
}

/// Failures that don't abort the command.
pub fn failure(msg: &str) {
    println!("{}", paint(RED, msg));
}

/// Red `Aborted. ...` text for precondition failures.
pub fn aborted(reason: &str) -> String {
    paint(RED, &format!("Aborted. {reason}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aborted_message_is_red() {
        assert_eq!(
            aborted("Not a weapp project folder!"),
            "\x1b[31mAborted. Not a weapp project folder!\x1b[0m"
        );
    }
}
