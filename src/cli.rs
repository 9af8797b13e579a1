use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "pinvault",
    about = "Keep account passwords in a local file, behind a 4-digit PIN.",
    long_about = "Keep account passwords in a local file, behind a 4-digit PIN.\n\n\
                  Passwords are obfuscated with a reversible character shift, not encrypted. \
                  Anyone who can read the passwords file can recover them.",
    version
)]
pub struct Cli {
    /// Passwords file to load and save (default: passwords.txt in the current directory).
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// TOML file with `file` and `shift` overrides.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}
