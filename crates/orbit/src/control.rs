use std::io::Write;
use std::os::unix::net::UnixStream;
use std::path::Path;
use strum::{Display as StrumDisplay, EnumIter, EnumString};
use thiserror::Error;

pub const SOCKET_PATH: &str = "/tmp/keepsake.sock";

/// One line of the daemon's text protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, EnumIter, StrumDisplay)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ControlCommand {
    Show,
    Hide,
    Sphere,
    Ribbon,
    Reload,
}

impl ControlCommand {
    pub fn parse_line(line: &str) -> Option<Self> {
        line.trim().parse().ok()
    }
}

#[derive(Debug, Error)]
pub enum ControlError {
    #[error("Failed to connect to keepsake daemon at {path}: {source}. Is keepsake running?")]
    Connect {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub fn send(cmd: ControlCommand) -> Result<(), ControlError> {
    send_to(Path::new(SOCKET_PATH), cmd)
}

pub fn send_to(path: &Path, cmd: ControlCommand) -> Result<(), ControlError> {
    let mut stream = UnixStream::connect(path).map_err(|source| ControlError::Connect {
        path: path.display().to_string(),
        source,
    })?;

    writeln!(stream, "{}", cmd)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader};
    use std::os::unix::net::UnixListener;

    #[test]
    fn test_parse_line() {
        assert_eq!(ControlCommand::parse_line(" show\n"), Some(ControlCommand::Show));
        assert_eq!(ControlCommand::parse_line("RIBBON"), Some(ControlCommand::Ribbon));
        assert_eq!(ControlCommand::parse_line("spin"), None);
        assert_eq!(ControlCommand::Reload.to_string(), "reload");
    }

    #[test]
    fn test_send_writes_one_line() {
        let path = std::env::temp_dir().join(format!("keepsake-test-{}.sock", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let listener = UnixListener::bind(&path).unwrap();

        send_to(&path, ControlCommand::Sphere).unwrap();

        let (stream, _) = listener.accept().unwrap();
        let mut line = String::new();
        BufReader::new(stream).read_line(&mut line).unwrap();
        assert_eq!(line, "sphere\n");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_daemon() {
        let path = Path::new("/nonexistent/keepsake.sock");
        let err = send_to(path, ControlCommand::Show).unwrap_err();
        assert!(matches!(err, ControlError::Connect { .. }));
    }
}
