//! MCP2515 CAN controller (SPI)
//!
//! The MCP2515 is a stand-alone CAN 2.0B controller with two receive
//! buffers, two acceptance masks and six acceptance filters.
//!
//! # SPI Protocol
//!
//! Every transaction is framed by chip select:
//! - RESET: `C0`
//! - READ: `03 addr` followed by the data clocked out
//! - WRITE: `02 addr data...` (address auto-increments)
//! - BIT MODIFY: `05 addr mask data`
//! - READ STATUS: `A0` followed by one status byte
//! - READ RX BUFFER: `90`/`94` followed by the 13 buffer bytes; raising
//!   chip select clears the buffer's RXnIF flag
//!
//! # Modes Used
//!
//! - Configuration: bit timing, masks and filters can only be written here
//! - Listen-only or normal: reception
//! - Sleep: the controller wakes itself on bus activity when WAKIE is set

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;
use pdc_core::config::BusConfig;
use pdc_core::traits::{BusLink, IdFilter};
use pdc_protocol::{id_from_raw, raw_id, CanFrame, Frame, Id, MAX_DATA_LEN};

/// MCP2515 register addresses
pub mod reg {
    pub const RXF0SIDH: u8 = 0x00;
    pub const RXF1SIDH: u8 = 0x04;
    pub const RXF2SIDH: u8 = 0x08;
    /// Operating mode status
    pub const CANSTAT: u8 = 0x0E;
    /// Mode request and clock out
    pub const CANCTRL: u8 = 0x0F;
    pub const RXF3SIDH: u8 = 0x10;
    pub const RXF4SIDH: u8 = 0x14;
    pub const RXF5SIDH: u8 = 0x18;
    /// Mask for receive buffer 0
    pub const RXM0SIDH: u8 = 0x20;
    /// Mask for receive buffer 1
    pub const RXM1SIDH: u8 = 0x24;
    pub const CNF3: u8 = 0x28;
    pub const CNF2: u8 = 0x29;
    pub const CNF1: u8 = 0x2A;
    /// Interrupt enable
    pub const CANINTE: u8 = 0x2B;
    /// Interrupt flags
    pub const CANINTF: u8 = 0x2C;
    pub const RXB0CTRL: u8 = 0x60;
    pub const RXB0SIDH: u8 = 0x61;
    pub const RXB1CTRL: u8 = 0x70;
    pub const RXB1SIDH: u8 = 0x71;
}

/// SPI instructions
pub mod instr {
    pub const RESET: u8 = 0xC0;
    pub const READ: u8 = 0x03;
    pub const WRITE: u8 = 0x02;
    pub const BIT_MODIFY: u8 = 0x05;
    pub const READ_STATUS: u8 = 0xA0;
    /// Read RXB0 starting at SIDH
    pub const READ_RXB0: u8 = 0x90;
    /// Read RXB1 starting at SIDH
    pub const READ_RXB1: u8 = 0x94;
}

/// Operating modes (CANCTRL.REQOP / CANSTAT.OPMOD)
pub mod mode {
    pub const NORMAL: u8 = 0x00;
    pub const SLEEP: u8 = 0x20;
    pub const LOOPBACK: u8 = 0x40;
    pub const LISTEN_ONLY: u8 = 0x60;
    pub const CONFIG: u8 = 0x80;
    pub const MASK: u8 = 0xE0;
}

/// Interrupt flag and enable bits
pub mod int {
    pub const RX0: u8 = 0x01;
    pub const RX1: u8 = 0x02;
    pub const WAKE: u8 = 0x40;
}

/// RXB0CTRL: roll over into RXB1 when RXB0 is full
const RXB0CTRL_BUKT: u8 = 0x04;
/// SIDL: extended identifier
const SIDL_IDE: u8 = 0x08;
/// SIDL: standard remote request (receive buffers only)
const SIDL_SRR: u8 = 0x10;
/// DLC: extended remote request
const DLC_RTR: u8 = 0x40;
const DLC_MASK: u8 = 0x0F;

/// CANSTAT polls before a mode change counts as failed
const MODE_POLL_LIMIT: usize = 64;

/// Receive buffer length read by READ RX BUFFER (SIDH..D7)
pub const RX_BUFFER_LEN: usize = 5 + MAX_DATA_LEN;

/// Bit timing register values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BitTiming {
    pub cnf1: u8,
    pub cnf2: u8,
    pub cnf3: u8,
}

impl BitTiming {
    const fn new(cnf1: u8, cnf2: u8, cnf3: u8) -> Self {
        Self { cnf1, cnf2, cnf3 }
    }

    /// Register values for an oscillator/bitrate pair
    pub fn lookup(oscillator_hz: u32, bitrate: u32) -> Option<Self> {
        let timing = match (oscillator_hz, bitrate) {
            (16_000_000, 500_000) => Self::new(0x00, 0xF0, 0x86),
            (16_000_000, 250_000) => Self::new(0x41, 0xF1, 0x85),
            (16_000_000, 125_000) => Self::new(0x03, 0xF0, 0x86),
            (16_000_000, 100_000) => Self::new(0x03, 0xFA, 0x87),
            (16_000_000, 50_000) => Self::new(0x07, 0xFA, 0x87),
            (8_000_000, 500_000) => Self::new(0x00, 0x90, 0x82),
            (8_000_000, 250_000) => Self::new(0x00, 0xB1, 0x85),
            (8_000_000, 125_000) => Self::new(0x01, 0xB1, 0x85),
            (8_000_000, 100_000) => Self::new(0x01, 0xB4, 0x86),
            (8_000_000, 50_000) => Self::new(0x03, 0xB4, 0x86),
            _ => return None,
        };
        Some(timing)
    }
}

/// Errors from the MCP2515 driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mcp2515Error<E> {
    /// SPI transfer failed
    Spi(E),
    /// Chip select could not be driven
    Pin,
    /// No bit timing for this oscillator/bitrate pair
    UnsupportedBitrate { oscillator_hz: u32, bitrate: u32 },
    /// Controller did not report the requested mode
    ModeTimeout { requested: u8, actual: u8 },
}

/// MCP2515 driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Mcp2515Config {
    /// Crystal frequency in Hz
    pub oscillator_hz: u32,
    /// Bus bitrate in bit/s
    pub bitrate: u32,
    /// Receive without acknowledging
    pub listen_only: bool,
}

impl Default for Mcp2515Config {
    fn default() -> Self {
        Self::from(&BusConfig::default())
    }
}

impl From<&BusConfig> for Mcp2515Config {
    fn from(bus: &BusConfig) -> Self {
        Self {
            oscillator_hz: bus.oscillator_hz,
            bitrate: bus.bitrate,
            listen_only: bus.listen_only,
        }
    }
}

impl Mcp2515Config {
    /// Mode used for reception
    pub fn operating_mode(&self) -> u8 {
        if self.listen_only {
            mode::LISTEN_ONLY
        } else {
            mode::NORMAL
        }
    }
}

/// Encode an identifier into SIDH, SIDL, EID8, EID0
///
/// `ide` sets the extended-identifier bit, which filters and receive
/// buffers use but masks do not.
pub fn encode_id(raw: u32, extended: bool, ide: bool) -> [u8; 4] {
    if extended {
        let sid = (raw >> 18) & 0x7FF;
        let eid = raw & 0x3_FFFF;
        let mut sidl = (((sid & 0x07) << 5) as u8) | ((eid >> 16) as u8 & 0x03);
        if ide {
            sidl |= SIDL_IDE;
        }
        [(sid >> 3) as u8, sidl, (eid >> 8) as u8, eid as u8]
    } else {
        let sid = raw & 0x7FF;
        [(sid >> 3) as u8, ((sid & 0x07) << 5) as u8, 0, 0]
    }
}

/// Decode a receive buffer (SIDH..D7) into a frame
pub fn decode_rx_buffer(buf: &[u8; RX_BUFFER_LEN]) -> Option<CanFrame> {
    let (sidh, sidl, eid8, eid0, dlc) = (buf[0], buf[1], buf[2], buf[3], buf[4]);
    let sid = ((sidh as u32) << 3) | ((sidl as u32) >> 5);
    let len = ((dlc & DLC_MASK) as usize).min(MAX_DATA_LEN);

    let (id, remote) = if sidl & SIDL_IDE != 0 {
        let raw = (sid << 18) | (((sidl & 0x03) as u32) << 16) | ((eid8 as u32) << 8) | eid0 as u32;
        (id_from_raw(raw, true).ok()?, dlc & DLC_RTR != 0)
    } else {
        (id_from_raw(sid, false).ok()?, sidl & SIDL_SRR != 0)
    };

    if remote {
        CanFrame::new_remote(id, len)
    } else {
        CanFrame::new(id, &buf[5..5 + len])
    }
}

/// MCP2515 driver over a blocking SPI bus and a chip-select pin
pub struct Mcp2515<SPI, CS> {
    spi: SPI,
    cs: CS,
    config: Mcp2515Config,
}

impl<SPI, CS> Mcp2515<SPI, CS>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    /// Create a driver; the controller is not touched until `init`
    pub fn new(spi: SPI, mut cs: CS, config: Mcp2515Config) -> Self {
        cs.set_high().ok();
        Self { spi, cs, config }
    }

    pub fn config(&self) -> &Mcp2515Config {
        &self.config
    }

    /// Release the bus and pin
    pub fn release(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }

    fn transaction(&mut self, buf: &mut [u8]) -> Result<(), Mcp2515Error<SPI::Error>> {
        self.cs.set_low().map_err(|_| Mcp2515Error::Pin)?;
        let result = self
            .spi
            .transfer_in_place(buf)
            .and_then(|_| self.spi.flush());
        self.cs.set_high().map_err(|_| Mcp2515Error::Pin)?;
        result.map_err(Mcp2515Error::Spi)
    }

    /// Software reset; leaves the controller in configuration mode
    pub fn reset(&mut self) -> Result<(), Mcp2515Error<SPI::Error>> {
        self.transaction(&mut [instr::RESET])
    }

    pub fn read_register(&mut self, addr: u8) -> Result<u8, Mcp2515Error<SPI::Error>> {
        let mut buf = [instr::READ, addr, 0];
        self.transaction(&mut buf)?;
        Ok(buf[2])
    }

    /// Write up to four consecutive registers
    fn write_registers(
        &mut self,
        addr: u8,
        data: &[u8],
    ) -> Result<(), Mcp2515Error<SPI::Error>> {
        debug_assert!(data.len() <= 4);
        let mut buf = [0u8; 6];
        let len = data.len().min(4);
        buf[0] = instr::WRITE;
        buf[1] = addr;
        buf[2..2 + len].copy_from_slice(&data[..len]);
        self.transaction(&mut buf[..2 + len])
    }

    pub fn modify_register(
        &mut self,
        addr: u8,
        mask: u8,
        data: u8,
    ) -> Result<(), Mcp2515Error<SPI::Error>> {
        self.transaction(&mut [instr::BIT_MODIFY, addr, mask, data])
    }

    fn read_status(&mut self) -> Result<u8, Mcp2515Error<SPI::Error>> {
        let mut buf = [instr::READ_STATUS, 0];
        self.transaction(&mut buf)?;
        Ok(buf[1])
    }

    /// Request a mode and wait until CANSTAT reports it
    pub fn set_mode(&mut self, requested: u8) -> Result<(), Mcp2515Error<SPI::Error>> {
        self.modify_register(reg::CANCTRL, mode::MASK, requested)?;

        let mut actual = 0;
        for _ in 0..MODE_POLL_LIMIT {
            actual = self.read_register(reg::CANSTAT)? & mode::MASK;
            if actual == requested {
                return Ok(());
            }
        }
        Err(Mcp2515Error::ModeTimeout { requested, actual })
    }

    /// Current operating mode
    pub fn mode(&mut self) -> Result<u8, Mcp2515Error<SPI::Error>> {
        Ok(self.read_register(reg::CANSTAT)? & mode::MASK)
    }

    fn read_rx_buffer(
        &mut self,
        command: u8,
    ) -> Result<Option<CanFrame>, Mcp2515Error<SPI::Error>> {
        let mut buf = [0u8; 1 + RX_BUFFER_LEN];
        buf[0] = command;
        self.transaction(&mut buf)?;

        let mut raw = [0u8; RX_BUFFER_LEN];
        raw.copy_from_slice(&buf[1..]);
        Ok(decode_rx_buffer(&raw))
    }
}

impl<SPI, CS> BusLink for Mcp2515<SPI, CS>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    type Error = Mcp2515Error<SPI::Error>;

    fn init(&mut self) -> Result<(), Self::Error> {
        let Mcp2515Config {
            oscillator_hz,
            bitrate,
            ..
        } = self.config;
        let timing = BitTiming::lookup(oscillator_hz, bitrate).ok_or(
            Mcp2515Error::UnsupportedBitrate {
                oscillator_hz,
                bitrate,
            },
        )?;

        self.reset()?;
        self.set_mode(mode::CONFIG)?;

        // CNF3, CNF2, CNF1 are consecutive
        self.write_registers(reg::CNF3, &[timing.cnf3, timing.cnf2, timing.cnf1])?;
        // Polled reception, no interrupts until sleep
        self.write_registers(reg::CANINTE, &[0x00, 0x00])?;
        self.write_registers(reg::RXB0CTRL, &[RXB0CTRL_BUKT])?;
        self.write_registers(reg::RXB1CTRL, &[0x00])?;

        self.set_mode(self.config.operating_mode())
    }

    fn configure_filters(&mut self, filter: &IdFilter) -> Result<(), Self::Error> {
        let extended = matches!(filter.id, Id::Extended(_));
        let mask = encode_id(filter.mask, extended, false);
        let id = encode_id(raw_id(filter.id), extended, true);

        self.set_mode(mode::CONFIG)?;

        self.write_registers(reg::RXM0SIDH, &mask)?;
        self.write_registers(reg::RXM1SIDH, &mask)?;
        for addr in [
            reg::RXF0SIDH,
            reg::RXF1SIDH,
            reg::RXF2SIDH,
            reg::RXF3SIDH,
            reg::RXF4SIDH,
            reg::RXF5SIDH,
        ] {
            self.write_registers(addr, &id)?;
        }

        self.set_mode(self.config.operating_mode())
    }

    fn try_receive(&mut self) -> Option<CanFrame> {
        let status = self.read_status().ok()?;
        let command = if status & int::RX0 != 0 {
            instr::READ_RXB0
        } else if status & int::RX1 != 0 {
            instr::READ_RXB1
        } else {
            return None;
        };
        self.read_rx_buffer(command).ok().flatten()
    }

    fn sleep(&mut self) -> Result<(), Self::Error> {
        self.modify_register(reg::CANINTF, int::WAKE, 0)?;
        self.modify_register(reg::CANINTE, int::WAKE, int::WAKE)?;
        self.set_mode(mode::SLEEP)
    }

    fn wake(&mut self) -> Result<(), Self::Error> {
        self.modify_register(reg::CANINTE, int::WAKE, 0)?;
        self.modify_register(reg::CANINTF, int::WAKE, 0)?;
        self.set_mode(self.config.operating_mode())
    }
}
