use std::io::{self, BufRead, IsTerminal, Write};

/// Line-oriented user interaction. `Ok(None)` means input has ended.
pub trait Console {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Like `read_line`, but without echo when attached to a terminal.
    fn read_secret(&mut self, prompt: &str) -> io::Result<Option<String>>;

    fn say(&mut self, text: &str) -> io::Result<()>;
}

/// The process's stdin/stdout.
pub struct Terminal;

impl Console for Terminal {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        print!("{}", prompt);
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn read_secret(&mut self, prompt: &str) -> io::Result<Option<String>> {
        if !io::stdin().is_terminal() {
            return self.read_line(prompt);
        }
        match rpassword::prompt_password(prompt) {
            Ok(secret) => Ok(Some(secret)),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn say(&mut self, text: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{}", text)
    }
}

#[cfg(test)]
pub mod scripted {
    use std::collections::VecDeque;
    use std::io;

    use super::Console;

    /// Replays canned input lines and records everything shown to the user.
    #[derive(Default)]
    pub struct Scripted {
        input: VecDeque<String>,
        pub transcript: Vec<String>,
    }

    impl Scripted {
        pub fn new(lines: &[&str]) -> Self {
            Self {
                input: lines.iter().map(|l| l.to_string()).collect(),
                transcript: Vec::new(),
            }
        }

        pub fn saw(&self, text: &str) -> bool {
            self.transcript.iter().any(|l| l == text)
        }

        pub fn count(&self, text: &str) -> usize {
            self.transcript.iter().filter(|l| *l == text).count()
        }
    }

    impl Console for Scripted {
        fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
            self.transcript.push(prompt.to_string());
            Ok(self.input.pop_front())
        }

        fn read_secret(&mut self, prompt: &str) -> io::Result<Option<String>> {
            self.read_line(prompt)
        }

        fn say(&mut self, text: &str) -> io::Result<()> {
            self.transcript.extend(text.lines().map(str::to_string));
            Ok(())
        }
    }
}
