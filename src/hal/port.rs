//! Hardware port abstraction
//!
//! The [`SaiPort`] trait is the boundary between the transfer engine and the
//! SAI registers. Implementations own the register block (or a PAC handle)
//! and translate each call into FIFO data register, control register and
//! configuration register accesses.

use crate::driver::config::{Direction, TransferFormat};
use crate::driver::interrupt::{InterruptEnable, StatusFlags};

/// Result of a word access: the latched fault flags on failure
pub type PortResult<T> = core::result::Result<T, StatusFlags>;

/// Register-level access to one SAI instance.
///
/// The engine calls these from both the application and the interrupt
/// context, always with exclusive access to the port.
///
/// # Example
///
/// ```ignore
/// struct Sai1 { regs: &'static RegisterBlock }
///
/// impl SaiPort for Sai1 {
///     fn write_word(&mut self, channel: u8, word: u32) -> PortResult<()> {
///         let tcsr = self.regs.tcsr.read();
///         if tcsr & CSR_FEF != 0 {
///             return Err(StatusFlags::from_raw(tcsr));
///         }
///         self.regs.tdr[channel as usize].write(word);
///         Ok(())
///     }
///     // ...
/// }
/// ```
pub trait SaiPort {
    /// Pop one word from the receive FIFO of data line `channel`
    fn read_word(&mut self, channel: u8) -> PortResult<u32>;

    /// Push one word into the transmit FIFO of data line `channel`
    fn write_word(&mut self, channel: u8, word: u32) -> PortResult<()>;

    /// Enable the interrupt/DMA request lines of a direction
    fn arm_request(&mut self, direction: Direction, enable: InterruptEnable);

    /// Disable every interrupt/DMA request line of a direction
    fn disarm_request(&mut self, direction: Direction);

    /// Current status flags of a direction
    fn status_flags(&mut self, direction: Direction) -> StatusFlags;

    /// Clear write-1-to-clear flags of a direction
    fn clear_fault_flags(&mut self, direction: Direction, flags: StatusFlags);

    /// Program word size, data lines, watermark and clocks of a direction
    fn apply_format(&mut self, direction: Direction, format: &TransferFormat);

    /// Software-reset a direction's transceiver logic and FIFO pointers
    fn software_reset(&mut self, direction: Direction);

    /// Current fault flags of a direction
    fn fault_flags(&mut self, direction: Direction) -> StatusFlags {
        self.status_flags(direction).faults()
    }
}

impl<T: SaiPort + ?Sized> SaiPort for &mut T {
    fn read_word(&mut self, channel: u8) -> PortResult<u32> {
        (**self).read_word(channel)
    }

    fn write_word(&mut self, channel: u8, word: u32) -> PortResult<()> {
        (**self).write_word(channel, word)
    }

    fn arm_request(&mut self, direction: Direction, enable: InterruptEnable) {
        (**self).arm_request(direction, enable);
    }

    fn disarm_request(&mut self, direction: Direction) {
        (**self).disarm_request(direction);
    }

    fn status_flags(&mut self, direction: Direction) -> StatusFlags {
        (**self).status_flags(direction)
    }

    fn clear_fault_flags(&mut self, direction: Direction, flags: StatusFlags) {
        (**self).clear_fault_flags(direction, flags);
    }

    fn apply_format(&mut self, direction: Direction, format: &TransferFormat) {
        (**self).apply_format(direction, format);
    }

    fn software_reset(&mut self, direction: Direction) {
        (**self).software_reset(direction);
    }

    fn fault_flags(&mut self, direction: Direction) -> StatusFlags {
        (**self).fault_flags(direction)
    }
}
