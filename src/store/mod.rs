pub mod file;

use crate::error::PinvaultError;
use crate::pin::Pin;
use secrecy::SecretString;

pub type Result<T> = std::result::Result<T, PinvaultError>;

/// Core abstraction for account storage. The session interacts only with this trait.
///
/// Reads and deletes are gated by the active PIN; adds are not.
pub trait Store {
    fn add(&mut self, name: &str, password: &SecretString) -> Result<()>;
    fn get(&self, name: &str, pin: Pin) -> Result<SecretString>;
    fn delete(&mut self, name: &str, pin: Pin) -> Result<()>;
    fn list(&self) -> Vec<String>;
    fn save(&self) -> Result<()>;
    fn set_pin(&mut self, pin: Pin);
    fn has_pin(&self) -> bool;
}
