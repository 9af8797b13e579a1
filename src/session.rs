//! Interactive menu loop driving a [`Store`] through a [`Console`].

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};

use crate::console::Console;
use crate::error::PinvaultError;
use crate::pin::{self, Pin};
use crate::store::file::Loaded;
use crate::store::Store;

const MENU: &str = "\nWhat would you like to do?
1. Add new password
2. View password
3. List accounts
4. Delete account
5. Save & Exit";

/// One entry of the main menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuChoice {
    AddPassword,
    ViewPassword,
    ListAccounts,
    DeleteAccount,
    SaveAndExit,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ChoiceError {
    NotANumber,
    OutOfRange,
}

impl fmt::Display for ChoiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotANumber => write!(f, "Please enter a number between 1 and 5"),
            Self::OutOfRange => {
                write!(f, "Invalid choice, please enter a number between 1 and 5")
            }
        }
    }
}

impl FromStr for MenuChoice {
    type Err = ChoiceError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ChoiceError::NotANumber);
        }
        match s.parse::<u8>() {
            Ok(1) => Ok(Self::AddPassword),
            Ok(2) => Ok(Self::ViewPassword),
            Ok(3) => Ok(Self::ListAccounts),
            Ok(4) => Ok(Self::DeleteAccount),
            Ok(5) => Ok(Self::SaveAndExit),
            _ => Err(ChoiceError::OutOfRange),
        }
    }
}

/// How a session ended.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Saved,
    /// Input ran out before "Save & Exit"; nothing was written.
    InputClosed,
}

enum Flow {
    Continue,
    Closed,
    Done,
}

/// Result of asking for an account name followed by a PIN.
enum Target {
    Closed,
    BlankName,
    Account(String, Pin),
}

pub struct Session<'a, S: Store, C: Console> {
    store: &'a mut S,
    console: &'a mut C,
}

impl<'a, S: Store, C: Console> Session<'a, S, C> {
    pub fn new(store: &'a mut S, console: &'a mut C) -> Self {
        Self { store, console }
    }

    pub fn run(&mut self, loaded: &Loaded) -> Result<Outcome> {
        self.say("\n=== Password Manager ===")?;
        if *loaded == Loaded::Fresh {
            self.say("No password file found. Starting fresh.")?;
        }

        if !self.store.has_pin() {
            self.say("\nSet up your master PIN")?;
            let Some(pin) = self.prompt_pin()? else {
                return self.input_closed();
            };
            self.store.set_pin(pin);
        }

        loop {
            self.say(MENU)?;
            let Some(line) = self.read_line("Your choice (1-5): ")? else {
                return self.input_closed();
            };
            let choice = match line.parse::<MenuChoice>() {
                Ok(choice) => choice,
                Err(e) => {
                    self.say(&e.to_string())?;
                    continue;
                }
            };

            let flow = match choice {
                MenuChoice::AddPassword => self.add_password()?,
                MenuChoice::ViewPassword => self.view_password()?,
                MenuChoice::ListAccounts => self.list_accounts()?,
                MenuChoice::DeleteAccount => self.delete_account()?,
                MenuChoice::SaveAndExit => self.save_and_exit()?,
            };
            match flow {
                Flow::Continue => {}
                Flow::Closed => return self.input_closed(),
                Flow::Done => return Ok(Outcome::Saved),
            }
        }
    }

    fn add_password(&mut self) -> Result<Flow> {
        let Some(name) = self.read_line("Account name: ")? else {
            return Ok(Flow::Closed);
        };
        let Some(password) = self.read_secret("Password: ")? else {
            return Ok(Flow::Closed);
        };
        if name.is_empty() || password.is_empty() {
            self.say("Account name and password cannot be empty!")?;
            return Ok(Flow::Continue);
        }

        match self.store.add(&name, &SecretString::new(password)) {
            Ok(()) => self.say(&format!("Password added for {}!", name))?,
            Err(e) => self.say(&e.to_string())?,
        }
        Ok(Flow::Continue)
    }

    fn view_password(&mut self) -> Result<Flow> {
        let (name, pin) = match self.prompt_target("Account name: ")? {
            Target::Account(name, pin) => (name, pin),
            Target::BlankName => return Ok(Flow::Continue),
            Target::Closed => return Ok(Flow::Closed),
        };

        match self.store.get(&name, pin) {
            Ok(password) => {
                self.say(&format!("Password for {}: {}", name, password.expose_secret()))?
            }
            Err(PinvaultError::AccessDenied) => self.say("Wrong PIN! Access denied.")?,
            Err(PinvaultError::NotFound(_)) => {
                self.say(&format!("No account named {} found.", name))?
            }
            Err(e) => self.say(&e.to_string())?,
        }
        Ok(Flow::Continue)
    }

    fn list_accounts(&mut self) -> Result<Flow> {
        let names = self.store.list();
        if names.is_empty() {
            self.say("No accounts stored yet.")?;
            return Ok(Flow::Continue);
        }

        self.say("Your saved accounts:")?;
        for (i, name) in names.iter().enumerate() {
            self.say(&format!("{}. {}", i + 1, name))?;
        }
        Ok(Flow::Continue)
    }

    fn delete_account(&mut self) -> Result<Flow> {
        let (name, pin) = match self.prompt_target("Account to delete: ")? {
            Target::Account(name, pin) => (name, pin),
            Target::BlankName => return Ok(Flow::Continue),
            Target::Closed => return Ok(Flow::Closed),
        };

        match self.store.delete(&name, pin) {
            Ok(()) => self.say(&format!("Account {} deleted.", name))?,
            Err(PinvaultError::AccessDenied) => self.say("Wrong PIN! Can't delete.")?,
            Err(PinvaultError::NotFound(_)) => {
                self.say(&format!("Account {} doesn't exist.", name))?
            }
            Err(e) => self.say(&e.to_string())?,
        }
        Ok(Flow::Continue)
    }

    fn save_and_exit(&mut self) -> Result<Flow> {
        if let Err(e) = self.store.save() {
            tracing::warn!(error = %e, "saving passwords failed");
            self.say(&format!("Failed to save passwords: {}", e))?;
            return Ok(Flow::Continue);
        }
        self.say("Passwords saved successfully.")?;
        self.say("Goodbye!")?;
        Ok(Flow::Done)
    }

    /// Ask for an account name and, if one was given, a PIN.
    fn prompt_target(&mut self, prompt: &str) -> Result<Target> {
        let Some(name) = self.read_line(prompt)? else {
            return Ok(Target::Closed);
        };
        if name.is_empty() {
            self.say("Please enter an account name")?;
            return Ok(Target::BlankName);
        }
        Ok(match self.prompt_pin()? {
            Some(pin) => Target::Account(name, pin),
            None => Target::Closed,
        })
    }

    /// Re-prompt until exactly four digits are entered.
    fn prompt_pin(&mut self) -> Result<Option<Pin>> {
        loop {
            let Some(input) = self.read_line("Enter 4-digit PIN: ")? else {
                return Ok(None);
            };
            if pin::is_four_digits(&input) {
                if let Ok(pin) = pin::normalize(&input) {
                    return Ok(Some(pin));
                }
            }
            self.say("Invalid PIN - must be 4 digits.")?;
        }
    }

    fn input_closed(&mut self) -> Result<Outcome> {
        tracing::debug!("input closed before save");
        self.say("\nInput closed. Exiting without saving.")?;
        Ok(Outcome::InputClosed)
    }

    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        let line = self
            .console
            .read_line(prompt)
            .context("Failed to read input")?;
        Ok(line.map(|l| l.trim().to_string()))
    }

    fn read_secret(&mut self, prompt: &str) -> Result<Option<String>> {
        let line = self
            .console
            .read_secret(prompt)
            .context("Failed to read password")?;
        Ok(line.map(|l| l.trim().to_string()))
    }

    fn say(&mut self, text: &str) -> Result<()> {
        self.console.say(text).context("Failed to write output")
    }
}
