use crate::utils::expand_tilde;
use log::{debug, error};
use std::process::{Command, Stdio};

/// Runs `command` and returns the last line of its output as the password.
///
/// The command is split on whitespace and run without a shell, `~` is
/// expanded in every token. Returns `None` if there is no command, it cannot
/// be run, exits unsuccessfully, or prints an empty last line.
///
/// Only stdout is captured, the command shares stdin and stderr with us so it
/// can prompt for a passphrase.
#[must_use]
pub fn password_from_command(command: Option<&str>) -> Option<String> {
    let args: Vec<String> = command?.split_whitespace().map(expand_tilde).collect();
    let (program, rest) = args.split_first()?;

    debug!("Getting password with command: {args:?}");

    let output = match Command::new(program)
        .args(rest)
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .output()
    {
        Ok(output) => output,
        Err(e) => {
            error!("Error: could not get password with command: {args:?} ({e})");
            return None;
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !output.status.success() {
        let code = output
            .status
            .code()
            .map_or_else(|| "none".to_string(), |code| code.to_string());
        let mut message = format!(
            "Error: could not get password with command: {args:?} (exit status: {code})\n{stdout}"
        );
        if !message.ends_with('\n') {
            message.push('\n');
        }
        error!("{message}");
        return None;
    }

    last_line(&stdout)
}

/// Text after the last line separator, ignoring trailing separators.
fn last_line(output: &str) -> Option<String> {
    let password = output
        .trim_end_matches(['\r', '\n'])
        .rsplit('\n')
        .next()
        .unwrap_or_default();
    if password.is_empty() {
        None
    } else {
        Some(password.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    /// Command line running a throwaway shell script
    fn script_command(dir: &Path, body: &str) -> String {
        let path = dir.join("pass.sh");
        fs::write(&path, format!("{body}\n")).unwrap();
        format!("sh {}", path.display())
    }

    #[test]
    fn test_last_line() {
        assert_eq!(Some("secret".to_string()), last_line("secret\n"));
        assert_eq!(Some("two".to_string()), last_line("one\ntwo\n\n"));
        assert_eq!(Some("crlf".to_string()), last_line("noise\r\ncrlf\r\n"));
        assert_eq!(None, last_line(""));
        assert_eq!(None, last_line("\n\n"));
    }

    #[test]
    fn test_no_command() {
        assert_eq!(None, password_from_command(None));
        assert_eq!(None, password_from_command(Some("")));
        assert_eq!(None, password_from_command(Some("   ")));
    }

    #[test]
    fn test_echo_command() {
        assert_eq!(
            Some("hunter2".to_string()),
            password_from_command(Some("echo hunter2"))
        );
    }

    #[test]
    fn test_last_line_of_script_output() {
        let dir = tempfile::tempdir().unwrap();
        let script = script_command(dir.path(), "echo 'gpg: decrypting'\necho s3cret");
        assert_eq!(
            Some("s3cret".to_string()),
            password_from_command(Some(&script))
        );
    }

    #[test]
    fn test_failing_command() {
        let dir = tempfile::tempdir().unwrap();
        let script = script_command(dir.path(), "echo leaked\nexit 3");
        assert_eq!(None, password_from_command(Some(&script)));
        assert_eq!(None, password_from_command(Some("false")));
    }

    // The command sees the same stdin and stderr as this process
    #[test]
    fn test_stdin_and_stderr_are_inherited() {
        for fd in ["/proc/self/fd/0", "/proc/self/fd/2"] {
            let ours = fs::read_link(fd)
                .ok()
                .map(|target| target.to_string_lossy().into_owned());
            let theirs = password_from_command(Some(&format!("readlink {fd}")));
            assert_eq!(ours, theirs, "{fd}");
        }
    }

    #[test]
    fn test_stderr_is_not_part_of_password() {
        let dir = tempfile::tempdir().unwrap();
        let script = script_command(dir.path(), "echo s3cret\necho 'Enter passphrase:' >&2");
        assert_eq!(
            Some("s3cret".to_string()),
            password_from_command(Some(&script))
        );
    }

    #[test]
    fn test_empty_output_is_no_password() {
        assert_eq!(None, password_from_command(Some("true")));
    }

    #[test]
    fn test_missing_program() {
        assert_eq!(
            None,
            password_from_command(Some("/nonexistent/ds-down-password-helper"))
        );
    }
}
