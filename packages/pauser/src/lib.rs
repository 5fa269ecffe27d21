use cosmwasm_std::{Addr, StdError, Storage};
use cw_storage_plus::Item;
use thiserror::Error;

pub const PAUSED_KEY: &str = "paused";
pub const PAUSERS_KEY: &str = "pausers";

#[derive(Error, Debug, PartialEq)]
pub enum PauseError {
    #[error(transparent)]
    Std(#[from] StdError),

    #[error("Presale is paused")]
    Paused {},

    #[error("Presale is not paused")]
    NotPaused {},

    #[error("Unauthorized pauser ({sender})")]
    Unauthorized { sender: Addr },
}

/// Pause switch backed by two storage items. The flag lives next to the
/// rest of the contract state, so it is carried across a code migration
/// like any other stored value.
pub struct PauseState<'a> {
    pub paused: Item<'a, bool>,
    pub pausers: Item<'a, Vec<Addr>>,
}

impl<'a> PauseState<'a> {
    pub fn new(paused_key: &'a str, pausers_key: &'a str) -> Result<Self, PauseError> {
        Ok(PauseState {
            paused: Item::new(paused_key),
            pausers: Item::new(pausers_key),
        })
    }

    /// Replaces the pauser set and clears the flag.
    /// The first call is unauthenticated; later calls need a current pauser.
    pub fn set_pausers(
        &self,
        storage: &mut dyn Storage,
        sender: Addr,
        pausers: Vec<Addr>,
    ) -> Result<(), PauseError> {
        let current = self.pausers.may_load(storage)?.unwrap_or_default();
        if !current.is_empty() {
            self.error_if_unauthorized(storage, &sender)?;
        }
        self.pausers.save(storage, &pausers)?;
        self.paused.save(storage, &false)?;
        Ok(())
    }

    pub fn error_if_paused(&self, storage: &dyn Storage) -> Result<(), PauseError> {
        if self.is_paused(storage)? {
            return Err(PauseError::Paused {});
        }
        Ok(())
    }

    pub fn error_if_unauthorized(
        &self,
        storage: &dyn Storage,
        sender: &Addr,
    ) -> Result<(), PauseError> {
        if !self.pausers(storage)?.contains(sender) {
            return Err(PauseError::Unauthorized {
                sender: sender.clone(),
            });
        }
        Ok(())
    }

    pub fn pause(&self, storage: &mut dyn Storage, sender: &Addr) -> Result<(), PauseError> {
        self.error_if_unauthorized(storage, sender)?;
        self.error_if_paused(storage)?;
        self.paused.save(storage, &true)?;
        Ok(())
    }

    pub fn unpause(&self, storage: &mut dyn Storage, sender: &Addr) -> Result<(), PauseError> {
        self.error_if_unauthorized(storage, sender)?;
        if !self.is_paused(storage)? {
            return Err(PauseError::NotPaused {});
        }
        self.paused.save(storage, &false)?;
        Ok(())
    }

    pub fn is_paused(&self, storage: &dyn Storage) -> Result<bool, PauseError> {
        Ok(self.paused.may_load(storage)?.unwrap_or(false))
    }

    pub fn pausers(&self, storage: &dyn Storage) -> Result<Vec<Addr>, PauseError> {
        Ok(self.pausers.may_load(storage)?.unwrap_or_default())
    }
}
