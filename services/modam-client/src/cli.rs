//! Command-line parsing
//!
//! `modam-client [--config PATH] <login EMAIL | logout | status | get PATH>`

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login { email: String },
    Logout,
    Status,
    Get { path: String },
    Help,
}

/// Parsed arguments.
#[derive(Debug, PartialEq, Eq)]
pub struct Invocation {
    pub config: Option<String>,
    pub command: Command,
}

pub const USAGE: &str = "usage: modam-client [--config PATH] <command>

commands:
  login EMAIL   log in (password read from MODAM_PASSWORD)
  logout        remove stored credentials
  status        report whether a session is stored
  get PATH      authenticated GET, prints the JSON body";

/// Parse arguments (without the program name).
pub fn parse(args: &[String]) -> Result<Invocation, String> {
    let mut config = None;
    let mut rest = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter
                    .next()
                    .ok_or_else(|| "--config requires a path".to_string())?;
                config = Some(path.clone());
            }
            "-h" | "--help" => {
                return Ok(Invocation {
                    config,
                    command: Command::Help,
                });
            }
            _ => rest.push(arg.as_str()),
        }
    }

    let command = match rest.as_slice() {
        ["login", email] => Command::Login {
            email: email.to_string(),
        },
        ["logout"] => Command::Logout,
        ["status"] => Command::Status,
        ["get", path] => Command::Get {
            path: path.to_string(),
        },
        [] => return Err("missing command".into()),
        other => return Err(format!("unrecognized arguments: {}", other.join(" "))),
    };

    Ok(Invocation { config, command })
}
