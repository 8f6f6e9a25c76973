use bitflags::bitflags;
use glam::Vec2;

use crate::world::{BackgroundChange, Destination, Trap};

bitflags! {
    /// What entering a trap changes.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct TrapEffects: u8 {
        // Show (or clear) a full-screen overlay.
        const OVERLAY    = 0x01;
        // Move the player to a destination.
        const TELEPORT   = 0x02;
        // The destination repaints the background.
        const BACKGROUND = 0x04;
        // The destination swaps the landscape strip.
        const LANDSCAPE  = 0x08;
    }
}

impl TrapEffects {
    pub fn of(trap: &Trap, destinations: &[Destination]) -> Self {
        let mut fx = Self::empty();
        fx.set(Self::OVERLAY, trap.overlay.is_some());
        if let Some(dest) = trap.destination.and_then(|i| destinations.get(i)) {
            fx |= Self::TELEPORT;
            fx.set(Self::BACKGROUND, dest.background != BackgroundChange::Keep);
            fx.set(Self::LANDSCAPE, dest.landscape.is_some());
        }
        fx
    }
}

/// A trap the player has just walked into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrapEntry {
    pub index: usize,
    pub effects: TrapEffects,
}

/// Remembers the last trap entered so standing in it fires only once.
#[derive(Clone, Copy, Debug, Default)]
pub struct TrapTracker {
    current: Option<usize>,
}

impl TrapTracker {
    #[inline]
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// First trap containing `pos`, if it is not the one entered last.
    ///
    /// Leaving a trap does not forget it: only entering a different trap
    /// re-arms the previous one.
    pub fn check(
        &mut self,
        traps: &[Trap],
        destinations: &[Destination],
        pos: Vec2,
    ) -> Option<TrapEntry> {
        let (index, trap) = traps.iter().enumerate().find(|(_, t)| t.contains(pos))?;
        if self.current == Some(index) {
            return None;
        }
        self.current = Some(index);
        Some(TrapEntry {
            index,
            effects: TrapEffects::of(trap, destinations),
        })
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
