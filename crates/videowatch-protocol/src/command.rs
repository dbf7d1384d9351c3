//! Outbound commands.

/// Commands the client can send to the status endpoint.
///
/// The wire format is the bare command string inside a WebSocket text frame;
/// there is no envelope around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Request a fresh status snapshot.
    Status,
}

impl Command {
    /// Returns the wire representation of the command.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Status => "/status",
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wire_format() {
        assert_eq!(Command::Status.as_str(), "/status");
        assert_eq!(Command::Status.to_string(), "/status");
    }
}
